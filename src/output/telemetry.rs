// 该文件是 GoalVision （球门视觉） 项目的一部分。
// src/output/telemetry.rs - 遥测输出
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

use std::io::Write;
use std::sync::Mutex;

use chrono::Utc;
use serde_json::{Value, json};
use thiserror::Error;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  model::{GoalDetection, StageView},
  output::Render,
};

#[derive(Error, Debug)]
pub enum TelemetryOutputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("不支持的遥测目标: {0}")]
  UnknownSink(String),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("JSON 序列化错误: {0}")]
  JsonError(#[from] serde_json::Error),
  #[error("遥测输出锁已失效")]
  Poisoned,
}

/// 每帧一行 JSON：时间戳、显示阶段、轮廓数、候选数与目标
pub struct TelemetryOutput {
  writer: Mutex<Box<dyn Write + Send>>,
}

impl FromUrlWithScheme for TelemetryOutput {
  const SCHEME: &'static str = "telemetry";
}

impl FromUrl for TelemetryOutput {
  type Error = TelemetryOutputError;

  fn from_url(uri: &Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(TelemetryOutputError::SchemeMismatch);
    }

    let writer: Box<dyn Write + Send> = match uri.host_str().unwrap_or("stdout") {
      "stdout" => Box::new(std::io::stdout()),
      "stderr" => Box::new(std::io::stderr()),
      other => return Err(TelemetryOutputError::UnknownSink(other.to_string())),
    };

    Ok(Self::with_writer(writer))
  }
}

impl TelemetryOutput {
  pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
    Self {
      writer: Mutex::new(writer),
    }
  }

  pub fn record(view: &StageView<'_>, result: &GoalDetection) -> Value {
    let target = match &result.target {
      Some(target) => json!({
        "x": target.region.x,
        "y": target.region.y,
        "width": target.region.width,
        "height": target.region.height,
        "offset": target.offset_px(),
      }),
      None => Value::Null,
    };

    json!({
      "timestamp": Utc::now().to_rfc3339(),
      "stage": view.stage.name(),
      "contours": result.contour_count,
      "candidates": result.candidate_count,
      "target": target,
    })
  }
}

impl Render<GoalDetection> for TelemetryOutput {
  type Error = TelemetryOutputError;

  fn render_result(&self, view: &StageView<'_>, result: &GoalDetection) -> Result<(), Self::Error> {
    let line = serde_json::to_string(&Self::record(view, result))?;
    let mut writer = self
      .writer
      .lock()
      .map_err(|_| TelemetryOutputError::Poisoned)?;
    writeln!(writer, "{}", line)?;
    writer.flush()?;
    Ok(())
  }
}
