// 该文件是 GoalVision （球门视觉） 项目的一部分。
// src/output/frame_directory.rs - 按帧编号保存显示图像
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

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tracing::debug;

use crate::{
  FromUrl, FromUrlWithScheme,
  model::{GoalDetection, StageView},
  output::Render,
};

#[derive(Error, Debug)]
pub enum FrameDirectoryError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("参数无效: {0}")]
  InvalidParameter(String),
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
}

/// 把每帧的显示图像存为 `{帧号:06}-{阶段}.png`
pub struct FrameDirectoryOutput {
  directory: PathBuf,
  frame_counter: AtomicU64,
  every: u64,
}

impl FromUrlWithScheme for FrameDirectoryOutput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for FrameDirectoryOutput {
  type Error = FrameDirectoryError;

  fn from_url(uri: &url::Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(FrameDirectoryError::SchemeMismatch);
    }

    let mut every = 1;
    for (k, v) in uri.query_pairs() {
      if k == "every" {
        every = v
          .parse::<u64>()
          .ok()
          .filter(|n| *n > 0)
          .ok_or_else(|| FrameDirectoryError::InvalidParameter(format!("every={}", v)))?;
      }
    }

    Ok(Self::new(uri.path()).with_every(every))
  }
}

impl FrameDirectoryOutput {
  pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
    Self {
      directory: directory.into(),
      frame_counter: AtomicU64::new(0),
      every: 1,
    }
  }

  /// 每 `every` 帧保存一次
  pub fn with_every(mut self, every: u64) -> Self {
    self.every = every.max(1);
    self
  }

  fn frame_id(&self) -> u64 {
    self.frame_counter.fetch_add(1, Ordering::Relaxed) + 1
  }
}

impl Render<GoalDetection> for FrameDirectoryOutput {
  type Error = FrameDirectoryError;

  fn render_result(&self, view: &StageView<'_>, _result: &GoalDetection) -> Result<(), Self::Error> {
    let id = self.frame_id();
    if (id - 1) % self.every != 0 {
      return Ok(());
    }

    if !self.directory.exists() {
      std::fs::create_dir_all(&self.directory)?;
    }
    let path = self
      .directory
      .join(format!("{:06}-{}.png", id, view.stage));
    view.image.save(&path)?;
    debug!("保存帧图像: {}", path.display());

    Ok(())
  }
}
