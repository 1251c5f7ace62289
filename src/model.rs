// 该文件是 GoalVision （球门视觉） 项目的一部分。
// src/model.rs - 检测模型
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

use image::{GrayImage, RgbImage};

pub trait Model {
  type Input;
  type Output;
  type Error;

  fn infer(&mut self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// 可以给出当前显示阶段图像的模型
pub trait Staged: Model {
  fn stage_view<'a>(&'a self, input: &'a Self::Input) -> StageView<'a>;
}

/// 帧像素坐标下的轴对齐矩形
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
  pub x: u32,
  pub y: u32,
  pub width: u32,
  pub height: u32,
}

impl Region {
  pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
    Self {
      x,
      y,
      width,
      height,
    }
  }

  pub fn area(&self) -> u64 {
    self.width as u64 * self.height as u64
  }

  pub fn center_x(&self) -> f32 {
    self.x as f32 + 0.5 * self.width as f32
  }
}

/// 被选中的目标及其相对画面中线的水平偏移
///
/// 偏移为正表示目标在中线左侧，为负表示在右侧。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
  pub region: Region,
  pub offset: f32,
}

impl Target {
  /// 截断为整数像素，与叠加图上显示的数值一致
  pub fn offset_px(&self) -> i32 {
    self.offset as i32
  }
}

/// 单帧的检测结果
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GoalDetection {
  /// 未找到符合尺寸窗口的轮廓时为 `None`
  pub target: Option<Target>,
  /// 本帧提取到的全部轮廓数（尺寸过滤之前）
  pub contour_count: usize,
  /// 通过尺寸过滤的候选数
  pub candidate_count: usize,
}

impl GoalDetection {
  pub fn region(&self) -> Option<Region> {
    self.target.map(|t| t.region)
  }

  pub fn offset(&self) -> Option<f32> {
    self.target.map(|t| t.offset)
  }

  pub fn is_empty(&self) -> bool {
    self.target.is_none()
  }
}

/// 某个显示阶段的图像，借用自检测器的工作缓冲区或输入帧
#[derive(Debug, Clone, Copy)]
pub enum StageImage<'a> {
  Gray(&'a GrayImage),
  Color(&'a RgbImage),
}

impl StageImage<'_> {
  pub fn dimensions(&self) -> (u32, u32) {
    match self {
      StageImage::Gray(image) => image.dimensions(),
      StageImage::Color(image) => image.dimensions(),
    }
  }

  pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> image::ImageResult<()> {
    match self {
      StageImage::Gray(image) => image.save(path),
      StageImage::Color(image) => image.save(path),
    }
  }
}

#[derive(Debug, Clone, Copy)]
pub struct StageView<'a> {
  pub stage: Stage,
  pub image: StageImage<'a>,
}

mod chroma;
mod contour;
mod goal_detector;
mod stage;

pub use self::chroma::{CR_THRESHOLD, cr_value, extract_cr_into, threshold_into};
pub use self::contour::{
  bounding_region, contour_area, simplify_chain, simplify_chain_into, size_proxy,
};
pub use self::goal_detector::{
  DetectorTelemetry, GoalDetector, GoalDetectorBuilder, GoalDetectorError,
};
pub use self::stage::{Stage, StageParseError, StageSelector};
