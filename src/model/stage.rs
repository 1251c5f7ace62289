// 该文件是 GoalVision （球门视觉） 项目的一部分。
// src/model/stage.rs - 显示阶段切换
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

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use thiserror::Error;

/// 输出到画面上的流水线阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stage {
  /// Cr 色度通道
  #[default]
  Chroma,
  /// 二值化掩码
  Threshold,
  /// 叠加了目标框与偏移量的原图
  Overlay,
  /// 原始输入
  Raw,
}

const STAGE_COUNT: u8 = Stage::ALL.len() as u8;

impl Stage {
  pub const ALL: [Stage; 4] = [Stage::Chroma, Stage::Threshold, Stage::Overlay, Stage::Raw];

  pub fn index(self) -> u8 {
    self as u8
  }

  /// 越界的编号按原始图像处理
  pub fn from_index(index: u8) -> Self {
    Self::ALL
      .get(index as usize)
      .copied()
      .unwrap_or(Stage::Raw)
  }

  pub fn next(self) -> Self {
    Self::from_index((self.index() + 1) % STAGE_COUNT)
  }

  pub fn name(self) -> &'static str {
    match self {
      Stage::Chroma => "chroma",
      Stage::Threshold => "threshold",
      Stage::Overlay => "overlay",
      Stage::Raw => "raw",
    }
  }
}

impl Display for Stage {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.name())
  }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("未知的显示阶段: {0}")]
pub struct StageParseError(pub String);

impl FromStr for Stage {
  type Err = StageParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Stage::ALL
      .into_iter()
      .find(|stage| stage.name().eq_ignore_ascii_case(s))
      .ok_or_else(|| StageParseError(s.to_string()))
  }
}

/// 当前显示阶段的共享句柄
///
/// 克隆得到的句柄指向同一个原子值，UI 线程可以随时切换，处理线程随时读取。
#[derive(Debug, Clone, Default)]
pub struct StageSelector {
  index: Arc<AtomicU8>,
}

impl StageSelector {
  pub fn new(stage: Stage) -> Self {
    Self {
      index: Arc::new(AtomicU8::new(stage.index())),
    }
  }

  pub fn current(&self) -> Stage {
    Stage::from_index(self.index.load(Ordering::Relaxed))
  }

  pub fn set(&self, stage: Stage) {
    self.index.store(stage.index(), Ordering::Relaxed);
  }

  /// 直接写入阶段编号，供只保存数字编号的上层界面使用
  pub fn set_index(&self, index: u8) {
    self.index.store(index, Ordering::Relaxed);
  }

  /// 切换到下一个阶段，最后一个之后回到第一个，返回切换后的阶段
  pub fn advance(&self) -> Stage {
    let step = |index: u8| Some(index.wrapping_add(1) % STAGE_COUNT);
    let previous = match self
      .index
      .fetch_update(Ordering::Relaxed, Ordering::Relaxed, step)
    {
      Ok(previous) | Err(previous) => previous,
    };
    Stage::from_index(previous.wrapping_add(1) % STAGE_COUNT)
  }
}
