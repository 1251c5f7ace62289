// 该文件是 GoalVision （球门视觉） 项目的一部分。
// tests/common/mod.rs - 测试辅助函数
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

#![allow(dead_code)]

use goalvision::{
  FRAME_HEIGHT, FRAME_WIDTH,
  frame::RgbFrame,
  model::{GoalDetector, GoalDetectorBuilder, Region},
};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

pub type Frame = RgbFrame<FRAME_WIDTH, FRAME_HEIGHT>;
pub type Detector = GoalDetector<FRAME_WIDTH, FRAME_HEIGHT>;

/// 红色在 Cr 通道上饱和，远高于阈值；黑色背景落在 128
pub const GOAL_RED: Rgb<u8> = Rgb([255, 0, 0]);
pub const FIELD_BLACK: Rgb<u8> = Rgb([0, 0, 0]);

pub fn detector() -> Detector {
  GoalDetectorBuilder::new()
    .build()
    .expect("failed to build detector")
}

/// 在黑色背景上画出若干实心红色方块
pub fn image_with_blobs(blobs: &[Region]) -> RgbImage {
  let mut image = RgbImage::from_pixel(FRAME_WIDTH, FRAME_HEIGHT, FIELD_BLACK);
  for blob in blobs {
    draw_filled_rect_mut(
      &mut image,
      Rect::at(blob.x as i32, blob.y as i32).of_size(blob.width, blob.height),
      GOAL_RED,
    );
  }
  image
}

pub fn frame_with_blobs(blobs: &[Region]) -> Frame {
  Frame::try_from(image_with_blobs(blobs)).expect("test frame has the deployment size")
}

/// 方框外圈为 `outer`，墙厚 `wall` 像素，中间为背景
pub fn frame_with_ring(outer: Region, wall: u32) -> Frame {
  let mut image = image_with_blobs(&[outer]);
  draw_filled_rect_mut(
    &mut image,
    Rect::at((outer.x + wall) as i32, (outer.y + wall) as i32)
      .of_size(outer.width - 2 * wall, outer.height - 2 * wall),
    FIELD_BLACK,
  );
  Frame::try_from(image).expect("test frame has the deployment size")
}
