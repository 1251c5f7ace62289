// 该文件是 GoalVision （球门视觉） 项目的一部分。
// src/model/goal_detector.rs - 球门检测流水线
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

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use image::{DynamicImage, GrayImage, RgbImage};
use imageproc::contours::{Contour, find_contours};
use imageproc::point::Point;
use thiserror::Error;
use tracing::{debug, info, trace};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::{FrameError, RgbFrame},
  model::{
    GoalDetection, Model, Region, Stage, StageImage, StageSelector, StageView, Staged, Target,
    chroma::{CR_THRESHOLD, extract_cr_into, threshold_into},
    contour::{bounding_region, simplify_chain_into, size_proxy},
  },
  output::draw::Draw,
};

/// 尺寸窗口（开区间），按比赛距离下球门的视在大小标定
const GOAL_MIN_SIZE: f64 = 25.0;
const GOAL_MAX_SIZE: f64 = 45.0;

const GOAL_SCHEME: &str = "goal";

const NO_TARGET: i64 = i64::MIN;

#[derive(Error, Debug)]
pub enum GoalDetectorError {
  #[error("URI 方案不匹配: 期望 '{expected}', 实际 '{found}'")]
  SchemeMismatch { expected: String, found: String },
  #[error("参数无效: {0}")]
  InvalidParameter(String),
  #[error("字体加载失败: {0}")]
  Font(#[from] ab_glyph::InvalidFont),
}

/// 供主程序遥测读取的旁路数据，读取不加锁
#[derive(Debug)]
pub struct DetectorTelemetry {
  contour_count: AtomicUsize,
  offset: AtomicI64,
}

impl Default for DetectorTelemetry {
  fn default() -> Self {
    Self {
      contour_count: AtomicUsize::new(0),
      offset: AtomicI64::new(NO_TARGET),
    }
  }
}

impl DetectorTelemetry {
  pub fn contour_count(&self) -> usize {
    self.contour_count.load(Ordering::Relaxed)
  }

  /// 最近一帧的整数偏移，没有目标时为 `None`
  pub fn offset(&self) -> Option<i32> {
    match self.offset.load(Ordering::Relaxed) {
      NO_TARGET => None,
      offset => Some(offset as i32),
    }
  }

  fn publish(&self, detection: &GoalDetection) {
    self
      .contour_count
      .store(detection.contour_count, Ordering::Relaxed);
    let offset = detection
      .target
      .map(|t| t.offset_px() as i64)
      .unwrap_or(NO_TARGET);
    self.offset.store(offset, Ordering::Relaxed);
  }
}

pub struct GoalDetectorBuilder {
  threshold: u8,
  min_size: f64,
  max_size: f64,
  stage: Stage,
  selector: Option<StageSelector>,
}

impl Default for GoalDetectorBuilder {
  fn default() -> Self {
    Self {
      threshold: CR_THRESHOLD,
      min_size: GOAL_MIN_SIZE,
      max_size: GOAL_MAX_SIZE,
      stage: Stage::default(),
      selector: None,
    }
  }
}

impl FromUrlWithScheme for GoalDetectorBuilder {
  const SCHEME: &'static str = GOAL_SCHEME;
}

impl FromUrl for GoalDetectorBuilder {
  type Error = GoalDetectorError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(GoalDetectorError::SchemeMismatch {
        expected: Self::SCHEME.to_string(),
        found: url.scheme().to_string(),
      });
    }

    let query: HashMap<String, String> = url
      .query_pairs()
      .map(|(k, v)| (String::from(k), String::from(v)))
      .collect();

    let mut builder = Self::default();
    if let Some(threshold) = query.get("threshold") {
      builder.threshold = threshold
        .parse()
        .map_err(|_| GoalDetectorError::InvalidParameter(format!("threshold={}", threshold)))?;
    }
    if let Some(min_size) = query.get("min-size") {
      builder.min_size = min_size
        .parse()
        .map_err(|_| GoalDetectorError::InvalidParameter(format!("min-size={}", min_size)))?;
    }
    if let Some(max_size) = query.get("max-size") {
      builder.max_size = max_size
        .parse()
        .map_err(|_| GoalDetectorError::InvalidParameter(format!("max-size={}", max_size)))?;
    }
    if let Some(stage) = query.get("stage") {
      builder.stage = stage
        .parse()
        .map_err(|e| GoalDetectorError::InvalidParameter(format!("{}", e)))?;
    }

    Ok(builder)
  }
}

impl GoalDetectorBuilder {
  /// 帧尺寸由 `build` 的目标类型决定，例如 `let d: GoalDetector<640, 480> = GoalDetectorBuilder::new().build()?`
  pub fn new() -> Self {
    Self::default()
  }

  pub fn threshold(mut self, threshold: u8) -> Self {
    self.threshold = threshold;
    self
  }

  pub fn size_window(mut self, min_size: f64, max_size: f64) -> Self {
    self.min_size = min_size;
    self.max_size = max_size;
    self
  }

  /// 初始显示阶段，`selector` 已指定时忽略
  pub fn stage(mut self, stage: Stage) -> Self {
    self.stage = stage;
    self
  }

  /// 与外部界面共享的阶段句柄
  pub fn selector(mut self, selector: StageSelector) -> Self {
    self.selector = Some(selector);
    self
  }

  pub fn build<const W: u32, const H: u32>(self) -> Result<GoalDetector<W, H>, GoalDetectorError> {
    if !(self.min_size >= 0.0 && self.min_size < self.max_size) {
      return Err(GoalDetectorError::InvalidParameter(format!(
        "尺寸窗口 ({}, {}) 无效",
        self.min_size, self.max_size
      )));
    }

    let selector = self
      .selector
      .unwrap_or_else(|| StageSelector::new(self.stage));
    let draw = Draw::new()?;

    info!(
      "创建球门检测器: {}x{}, 阈值 {}, 尺寸窗口 ({}, {}), 显示阶段 {}",
      W,
      H,
      self.threshold,
      self.min_size,
      self.max_size,
      selector.current()
    );

    Ok(GoalDetector {
      threshold: self.threshold,
      min_size: self.min_size,
      max_size: self.max_size,
      selector,
      telemetry: Arc::new(DetectorTelemetry::default()),
      draw,
      workspace: Workspace::default(),
    })
  }
}

/// 每帧复用的工作缓冲区，归检测器独占
struct Workspace<const W: u32, const H: u32> {
  chroma: GrayImage,
  mask: GrayImage,
  overlay: RgbImage,
  contours: Vec<Contour<i32>>,
  // 合并直线段时的中转缓冲，与轮廓的点列交替使用
  chain: Vec<Point<i32>>,
}

impl<const W: u32, const H: u32> Default for Workspace<W, H> {
  fn default() -> Self {
    Self {
      chroma: GrayImage::new(W, H),
      mask: GrayImage::new(W, H),
      overlay: RgbImage::new(W, H),
      contours: Vec::new(),
      chain: Vec::new(),
    }
  }
}

/// 球门检测器
///
/// 每帧依次执行：Cr 通道提取、固定阈值二值化、轮廓提取、尺寸过滤、
/// 选取外接矩形面积最大的候选、计算其相对画面中线的偏移、绘制叠加图。
/// 无论当前显示哪个阶段，四张阶段图像都会在每帧重新计算。
pub struct GoalDetector<const W: u32, const H: u32> {
  threshold: u8,
  min_size: f64,
  max_size: f64,
  selector: StageSelector,
  telemetry: Arc<DetectorTelemetry>,
  draw: Draw<'static>,
  workspace: Workspace<W, H>,
}

impl<const W: u32, const H: u32> GoalDetector<W, H> {
  /// 显示阶段句柄，可交给 UI 线程用于切换
  pub fn selector(&self) -> StageSelector {
    self.selector.clone()
  }

  pub fn telemetry(&self) -> Arc<DetectorTelemetry> {
    self.telemetry.clone()
  }

  /// 最近一帧提取到的轮廓（已合并直线段上的点）
  pub fn contours(&self) -> &[Contour<i32>] {
    &self.workspace.contours
  }

  /// 校验任意来源的图像后执行检测，校验失败不会改动任何工作缓冲区
  pub fn detect_image(&mut self, image: DynamicImage) -> Result<GoalDetection, FrameError> {
    let frame = RgbFrame::<W, H>::try_from(image)?;
    Ok(self.process_frame(&frame))
  }

  pub fn process_frame(&mut self, frame: &RgbFrame<W, H>) -> GoalDetection {
    let ws = &mut self.workspace;

    extract_cr_into(frame.as_image(), &mut ws.chroma);
    threshold_into(&ws.chroma, &mut ws.mask, self.threshold);

    ws.contours.clear();
    ws.contours.extend(find_contours::<i32>(&ws.mask));
    for contour in ws.contours.iter_mut() {
      simplify_chain_into(&contour.points, &mut ws.chain);
      std::mem::swap(&mut contour.points, &mut ws.chain);
    }
    let contour_count = ws.contours.len();
    debug!("找到 {} 个轮廓", contour_count);

    let mut chosen: Option<Region> = None;
    let mut best_area = 0u64;
    let mut candidate_count = 0usize;
    for contour in &ws.contours {
      let size = size_proxy(&contour.points);
      trace!("轮廓尺寸: {:.2}", size);
      if size <= self.min_size || size >= self.max_size {
        continue;
      }
      let Some(region) = bounding_region(&contour.points) else {
        continue;
      };
      candidate_count += 1;
      // 面积相同时保留先发现的候选
      if region.area() > best_area {
        best_area = region.area();
        chosen = Some(region);
      }
    }

    let target = chosen.map(|region| Target {
      region,
      offset: (W / 2) as f32 - region.center_x(),
    });

    let overlay: &mut [u8] = &mut ws.overlay;
    overlay.copy_from_slice(frame.as_nhwc());
    if let Some(target) = &target {
      self.draw.draw_target(&mut ws.overlay, target);
    }

    let detection = GoalDetection {
      target,
      contour_count,
      candidate_count,
    };
    self.telemetry.publish(&detection);
    detection
  }
}

impl<const W: u32, const H: u32> Model for GoalDetector<W, H> {
  type Input = RgbFrame<W, H>;
  type Output = GoalDetection;
  type Error = Infallible;

  fn infer(&mut self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    Ok(self.process_frame(input))
  }
}

impl<const W: u32, const H: u32> Staged for GoalDetector<W, H> {
  fn stage_view<'a>(&'a self, input: &'a Self::Input) -> StageView<'a> {
    let stage = self.selector.current();
    let image = match stage {
      Stage::Chroma => StageImage::Gray(&self.workspace.chroma),
      Stage::Threshold => StageImage::Gray(&self.workspace.mask),
      Stage::Overlay => StageImage::Color(&self.workspace.overlay),
      Stage::Raw => StageImage::Color(input.as_image()),
    };
    StageView { stage, image }
  }
}
