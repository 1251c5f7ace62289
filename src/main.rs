// 该文件是 GoalVision （球门视觉） 项目的一部分。
// src/main.rs - 连续帧检测主程序
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

use std::io::BufRead;
use std::thread;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use url::Url;

use goalvision::{
  FRAME_HEIGHT, FRAME_WIDTH, FromUrl,
  input::InputWrapper,
  model::{GoalDetector, GoalDetectorBuilder, StageSelector},
  output::OutputWrapper,
  task::{ContinuousTask, Task},
};

/// GoalVision 参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 检测器配置，例如 goal://?threshold=160&min-size=25&max-size=45&stage=chroma
  #[arg(long, value_name = "DETECTOR", default_value = "goal://")]
  pub detector: Url,
  /// 输入来源: image:///path/file.png 或 folder:///path/dir，可加 ?resize
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,
  /// 输出路径，可重复: image://、folder://、telemetry://stdout
  #[arg(long, value_name = "OUTPUT", required = true)]
  pub output: Vec<Url>,
  /// 最大处理帧数
  #[arg(long, value_name = "FRAME_NUMBER")]
  pub frame_number: Option<usize>,
  /// 从标准输入读取切换信号，每读到一行切换一次显示阶段
  #[arg(long)]
  pub tap_stdin: bool,
}

fn spawn_stdin_taps(selector: StageSelector) {
  thread::spawn(move || {
    for line in std::io::stdin().lock().lines() {
      if let Err(e) = line {
        warn!("读取标准输入失败: {}", e);
        break;
      }
      info!("切换显示阶段: {}", selector.advance());
    }
  });
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("检测器配置: {}", args.detector);
  info!("输入来源: {}", args.input);
  for output in &args.output {
    info!("输出路径: {}", output);
  }

  let input = InputWrapper::<FRAME_WIDTH, FRAME_HEIGHT>::from_url(&args.input)?;
  let detector: GoalDetector<FRAME_WIDTH, FRAME_HEIGHT> =
    GoalDetectorBuilder::from_url(&args.detector)?.build()?;
  let outputs = args
    .output
    .iter()
    .map(OutputWrapper::from_url)
    .collect::<Result<Vec<_>, _>>()?;

  if args.tap_stdin {
    spawn_stdin_taps(detector.selector());
  }

  ContinuousTask::default()
    .with_frame_number(args.frame_number)
    .run_task(input, detector, outputs)?;

  Ok(())
}
