// 该文件是 GoalVision （球门视觉） 项目的一部分。
// tests/tasks.rs - 任务执行测试
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 GoalVision Contributors

mod common;

use std::convert::Infallible;
use std::path::Path;
use std::sync::{Arc, Mutex};

use common::*;
use goalvision::{
  FRAME_HEIGHT, FRAME_WIDTH,
  input::{FolderInput, ImageFileInput},
  model::{GoalDetection, Region, Stage, StageView},
  output::Render,
  task::{ContinuousTask, OneShotTask, RepeatShotTask, Task},
};
use image::RgbImage;
use tempfile::tempdir;

type Folder = FolderInput<FRAME_WIDTH, FRAME_HEIGHT>;

/// 记录每次渲染时的显示阶段与检测结果
#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<(Stage, GoalDetection)>>>);

impl Recorder {
  fn take(&self) -> Vec<(Stage, GoalDetection)> {
    std::mem::take(&mut *self.0.lock().unwrap())
  }
}

impl Render<GoalDetection> for Recorder {
  type Error = Infallible;

  fn render_result(&self, view: &StageView<'_>, result: &GoalDetection) -> Result<(), Self::Error> {
    self.0.lock().unwrap().push((view.stage, result.clone()));
    Ok(())
  }
}

fn save(dir: &Path, name: &str, image: &RgbImage) {
  image.save(dir.join(name)).unwrap();
}

#[test]
fn continuous_task_skips_bad_frames() {
  let dir = tempdir().unwrap();
  save(
    dir.path(),
    "001.png",
    &image_with_blobs(&[Region::new(300, 200, 40, 40)]),
  );
  save(dir.path(), "002.png", &RgbImage::new(320, 240));
  std::fs::write(dir.path().join("003.png"), b"not an image").unwrap();
  save(
    dir.path(),
    "004.png",
    &image_with_blobs(&[Region::new(100, 220, 40, 40)]),
  );
  std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

  let input = Folder::open(dir.path()).unwrap();
  assert_eq!(input.remaining(), 4);

  let recorder = Recorder::default();
  ContinuousTask::default()
    .with_ctrlc(false)
    .run_task(input, detector(), recorder.clone())
    .unwrap();

  let seen = recorder.take();
  assert_eq!(seen.len(), 2);
  assert_eq!(seen[0].1.offset(), Some(0.0));
  assert_eq!(seen[1].1.offset(), Some(200.0));
  assert!(seen.iter().all(|(stage, _)| *stage == Stage::Chroma));
}

#[test]
fn continuous_task_stops_at_frame_number() {
  let dir = tempdir().unwrap();
  for i in 0..5 {
    save(dir.path(), &format!("{:03}.png", i), &image_with_blobs(&[]));
  }

  let recorder = Recorder::default();
  ContinuousTask::default()
    .with_ctrlc(false)
    .with_frame_number(Some(3))
    .run_task(Folder::open(dir.path()).unwrap(), detector(), recorder.clone())
    .unwrap();

  let seen = recorder.take();
  assert_eq!(seen.len(), 3);
  assert!(seen.iter().all(|(_, detection)| detection.is_empty()));
}

#[test]
fn one_shot_uses_first_valid_frame() {
  let dir = tempdir().unwrap();
  save(dir.path(), "a.png", &RgbImage::new(64, 48));
  save(
    dir.path(),
    "b.png",
    &image_with_blobs(&[Region::new(500, 220, 40, 40)]),
  );
  save(dir.path(), "c.png", &image_with_blobs(&[]));

  let recorder = Recorder::default();
  OneShotTask
    .run_task(Folder::open(dir.path()).unwrap(), detector(), recorder.clone())
    .unwrap();

  let seen = recorder.take();
  assert_eq!(seen.len(), 1);
  assert_eq!(seen[0].1.offset(), Some(-200.0));
}

#[test]
fn one_shot_without_valid_frames_fails() {
  let dir = tempdir().unwrap();
  save(dir.path(), "a.png", &RgbImage::new(64, 48));

  let recorder = Recorder::default();
  let result = OneShotTask.run_task(Folder::open(dir.path()).unwrap(), detector(), recorder.clone());

  assert!(result.is_err());
  assert!(recorder.take().is_empty());
}

#[test]
fn folder_input_resizes_on_request() {
  let dir = tempdir().unwrap();
  save(dir.path(), "small.png", &RgbImage::new(320, 240));

  let recorder = Recorder::default();
  ContinuousTask::default()
    .with_ctrlc(false)
    .run_task(
      Folder::open(dir.path()).unwrap().with_resize(true),
      detector(),
      recorder.clone(),
    )
    .unwrap();

  assert_eq!(recorder.take().len(), 1);
}

#[test]
fn repeat_shot_renders_every_run() {
  let input = ImageFileInput::<FRAME_WIDTH, FRAME_HEIGHT>::from_image(image_with_blobs(&[
    Region::new(300, 200, 40, 40),
  ]));

  let recorder = Recorder::default();
  RepeatShotTask::default()
    .with_repeat_times(4)
    .run_task(input, detector(), recorder.clone())
    .unwrap();

  let seen = recorder.take();
  assert_eq!(seen.len(), 4);
  assert!(seen.windows(2).all(|pair| pair[0].1 == pair[1].1));
}

#[test]
fn repeat_shot_skips_bad_leading_frames() {
  let dir = tempdir().unwrap();
  save(dir.path(), "a.png", &RgbImage::new(64, 48));
  std::fs::write(dir.path().join("b.png"), b"truncated").unwrap();
  save(
    dir.path(),
    "c.png",
    &image_with_blobs(&[Region::new(100, 220, 40, 40)]),
  );

  let recorder = Recorder::default();
  RepeatShotTask::default()
    .with_repeat_times(3)
    .run_task(Folder::open(dir.path()).unwrap(), detector(), recorder.clone())
    .unwrap();

  let seen = recorder.take();
  assert_eq!(seen.len(), 3);
  assert!(seen.iter().all(|(_, detection)| detection.offset() == Some(200.0)));
}

#[test]
fn repeat_shot_without_valid_frames_fails() {
  let dir = tempdir().unwrap();
  save(dir.path(), "a.png", &RgbImage::new(64, 48));

  let recorder = Recorder::default();
  let result = RepeatShotTask::default()
    .with_repeat_times(3)
    .run_task(Folder::open(dir.path()).unwrap(), detector(), recorder.clone());

  assert!(result.is_err());
  assert!(recorder.take().is_empty());
}
