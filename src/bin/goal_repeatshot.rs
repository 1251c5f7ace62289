// 该文件是 GoalVision （球门视觉） 项目的一部分。
// src/bin/goal_repeatshot.rs - 单帧重复检测，用于测量每帧耗时
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

use anyhow::Result;
use clap::Parser;
use url::Url;

use goalvision::{
  FRAME_HEIGHT, FRAME_WIDTH, FromUrl,
  input::InputWrapper,
  model::{GoalDetector, GoalDetectorBuilder},
  output::OutputWrapper,
  task::{RepeatShotTask, Task},
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  #[arg(long, value_name = "DETECTOR", default_value = "goal://")]
  pub detector: Url,
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,
  #[arg(long, value_name = "OUTPUT")]
  pub output: Url,
  /// 重复次数
  #[arg(long, default_value = "1000", value_name = "COUNT")]
  pub repeat: usize,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("输入来源: {}", args.input);
  info!("重复次数: {}", args.repeat);

  let input = InputWrapper::<FRAME_WIDTH, FRAME_HEIGHT>::from_url(&args.input)?;
  let detector: GoalDetector<FRAME_WIDTH, FRAME_HEIGHT> =
    GoalDetectorBuilder::from_url(&args.detector)?.build()?;
  let output = OutputWrapper::from_url(&args.output)?;

  RepeatShotTask::default()
    .with_repeat_times(args.repeat)
    .run_task(input, detector, output)?;

  Ok(())
}
