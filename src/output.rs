// 该文件是 GoalVision （球门视觉） 项目的一部分。
// src/output.rs - 输出定义
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

use crate::FromUrl;
#[cfg(any(
  feature = "save_image_file",
  feature = "frame_directory",
  feature = "telemetry_output"
))]
use crate::FromUrlWithScheme;
use crate::model::{GoalDetection, StageView};
use thiserror::Error;
use url::Url;

pub trait Render<Output>: Sized {
  type Error;
  fn render_result(&self, view: &StageView<'_>, result: &Output) -> Result<(), Self::Error>;
}

/// 依次交给每个输出，遇到第一个错误即返回
impl<Output, O: Render<Output>> Render<Output> for Vec<O> {
  type Error = O::Error;

  fn render_result(&self, view: &StageView<'_>, result: &Output) -> Result<(), Self::Error> {
    for output in self {
      output.render_result(view, result)?;
    }
    Ok(())
  }
}

pub mod draw;

#[cfg(feature = "save_image_file")]
mod save_image_file;
#[cfg(feature = "save_image_file")]
pub use self::save_image_file::{SaveImageFileError, SaveImageFileOutput};

#[cfg(feature = "frame_directory")]
mod frame_directory;
#[cfg(feature = "frame_directory")]
pub use self::frame_directory::{FrameDirectoryError, FrameDirectoryOutput};

#[cfg(feature = "telemetry_output")]
mod telemetry;
#[cfg(feature = "telemetry_output")]
pub use self::telemetry::{TelemetryOutput, TelemetryOutputError};

#[derive(Error, Debug)]
pub enum OutputError {
  #[cfg(feature = "save_image_file")]
  #[error("保存图像文件错误: {0}")]
  SaveImageFileError(#[from] SaveImageFileError),
  #[cfg(feature = "frame_directory")]
  #[error("帧目录输出错误: {0}")]
  FrameDirectoryError(#[from] FrameDirectoryError),
  #[cfg(feature = "telemetry_output")]
  #[error("遥测输出错误: {0}")]
  TelemetryOutputError(#[from] TelemetryOutputError),
  #[error("URI 方案不匹配")]
  SchemeMismatch,
}

pub enum OutputWrapper {
  #[cfg(feature = "save_image_file")]
  SaveImageFileOutput(SaveImageFileOutput),
  #[cfg(feature = "frame_directory")]
  FrameDirectoryOutput(FrameDirectoryOutput),
  #[cfg(feature = "telemetry_output")]
  TelemetryOutput(TelemetryOutput),
}

impl FromUrl for OutputWrapper {
  type Error = OutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      #[cfg(feature = "save_image_file")]
      SaveImageFileOutput::SCHEME => {
        let output = SaveImageFileOutput::from_url(url)?;
        Ok(OutputWrapper::SaveImageFileOutput(output))
      }
      #[cfg(feature = "frame_directory")]
      FrameDirectoryOutput::SCHEME => {
        let output = FrameDirectoryOutput::from_url(url)?;
        Ok(OutputWrapper::FrameDirectoryOutput(output))
      }
      #[cfg(feature = "telemetry_output")]
      TelemetryOutput::SCHEME => {
        let output = TelemetryOutput::from_url(url)?;
        Ok(OutputWrapper::TelemetryOutput(output))
      }
      _ => Err(OutputError::SchemeMismatch),
    }
  }
}

impl Render<GoalDetection> for OutputWrapper {
  type Error = OutputError;

  #[allow(unused_variables)]
  fn render_result(&self, view: &StageView<'_>, result: &GoalDetection) -> Result<(), Self::Error> {
    match self {
      #[cfg(feature = "save_image_file")]
      OutputWrapper::SaveImageFileOutput(output) => output
        .render_result(view, result)
        .map_err(OutputError::from),
      #[cfg(feature = "frame_directory")]
      OutputWrapper::FrameDirectoryOutput(output) => output
        .render_result(view, result)
        .map_err(OutputError::from),
      #[cfg(feature = "telemetry_output")]
      OutputWrapper::TelemetryOutput(output) => output
        .render_result(view, result)
        .map_err(OutputError::from),
    }
  }
}
