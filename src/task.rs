// 该文件是 GoalVision （球门视觉） 项目的一部分。
// src/task.rs - 任务执行
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

use std::{fmt::Debug, thread, time::Duration};
use tracing::{info, warn};

use crate::{model::Staged, output::Render};

pub trait Task<I, M, O>: Sized {
  type Error;
  fn run_task(self, input: I, model: M, output: O) -> Result<(), Self::Error>;
}

/// 取第一帧有效输入，无效帧记录警告后跳过
fn first_valid_frame<F, E: std::fmt::Display>(
  input: impl Iterator<Item = Result<F, E>>,
) -> anyhow::Result<F> {
  input
    .filter_map(|frame| frame.map_err(|e| warn!("跳过无效输入帧: {}", e)).ok())
    .next()
    .ok_or_else(|| anyhow::anyhow!("没有有效的输入帧"))
}

pub struct OneShotTask;

impl<
  F,
  D: Debug,
  IE: std::error::Error + Sync + Send + 'static,
  ME: std::error::Error + Sync + Send + 'static,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = Result<F, IE>>,
  M: Staged<Input = F, Output = D, Error = ME>,
  O: Render<D, Error = RE>,
> Task<I, M, O> for OneShotTask
{
  type Error = anyhow::Error;

  fn run_task(self, input: I, mut model: M, output: O) -> Result<(), Self::Error> {
    info!("开始任务...");
    let frame = first_valid_frame(input)?;
    info!("输入帧获取成功，开始检测...");
    let now = std::time::Instant::now();
    let result = model.infer(&frame)?;
    let elapsed = now.elapsed();
    info!("检测完成，耗时: {:.2?}, 结果: {:?}", elapsed, result);
    output.render_result(&model.stage_view(&frame), &result)?;
    info!("渲染完成，耗时: {:.2?}", now.elapsed());

    Ok(())
  }
}

pub struct RepeatShotTask {
  repeat_times: usize,
}

impl Default for RepeatShotTask {
  fn default() -> Self {
    Self { repeat_times: 1000 }
  }
}

impl RepeatShotTask {
  pub fn with_repeat_times(mut self, repeat_times: usize) -> Self {
    self.repeat_times = repeat_times;
    self
  }
}

impl<
  F,
  D,
  IE: std::error::Error + Sync + Send + 'static,
  ME: std::error::Error + Sync + Send + 'static,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = Result<F, IE>>,
  M: Staged<Input = F, Output = D, Error = ME>,
  O: Render<D, Error = RE>,
> Task<I, M, O> for RepeatShotTask
{
  type Error = anyhow::Error;

  fn run_task(self, input: I, mut model: M, output: O) -> Result<(), Self::Error> {
    info!("开始任务...");
    let frame = first_valid_frame(input)?;
    info!("输入帧获取成功，开始检测...");
    let mut times = Vec::with_capacity(self.repeat_times);
    for i in 0..self.repeat_times {
      let now = std::time::Instant::now();
      let result = model.infer(&frame)?;
      let elapsed = now.elapsed();
      info!("({})检测完成，耗时: {:.2?}", i, elapsed);
      output.render_result(&model.stage_view(&frame), &result)?;
      times.push(elapsed);
    }

    // 前两次包含缓存预热，不计入平均
    if times.len() > 2 {
      warn!(
        "平均检测时间: {:.2?}",
        times.iter().skip(2).sum::<Duration>() / (times.len() - 2) as u32
      );
    }

    Ok(())
  }
}

#[derive(Debug)]
pub struct ContinuousTask {
  frame_number: Option<usize>,
  handle_ctrlc: bool,
}

impl Default for ContinuousTask {
  fn default() -> Self {
    Self {
      frame_number: None,
      handle_ctrlc: true,
    }
  }
}

impl ContinuousTask {
  pub fn with_frame_number(mut self, frame_number: Option<usize>) -> Self {
    self.frame_number = frame_number;
    self
  }

  /// 是否安装 Ctrl-C 处理函数，一个进程只能安装一次
  pub fn with_ctrlc(mut self, handle_ctrlc: bool) -> Self {
    self.handle_ctrlc = handle_ctrlc;
    self
  }
}

impl<
  F,
  D: Debug,
  IE: std::error::Error + Sync + Send + 'static,
  ME: std::error::Error + Sync + Send + 'static,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = Result<F, IE>>,
  M: Staged<Input = F, Output = D, Error = ME>,
  O: Render<D, Error = RE>,
> Task<I, M, O> for ContinuousTask
{
  type Error = anyhow::Error;

  fn run_task(self, input: I, mut model: M, output: O) -> Result<(), Self::Error> {
    info!("开始任务...");
    let (tx, rx) = std::sync::mpsc::channel();

    if self.handle_ctrlc {
      ctrlc::set_handler(move || {
        info!("收到中断信号，准备退出...");
        let _ = tx.send(());
        thread::spawn(|| {
          thread::sleep(Duration::from_secs(30));
          warn!("强制退出程序");
          std::process::exit(1);
        });
      })?;
    }

    let mut frame_index = 0usize;
    let mut rejected = 0usize;
    let mut now = std::time::Instant::now();
    for frame in input {
      frame_index = frame_index.wrapping_add(1);
      match frame {
        Ok(frame) => {
          let result = model.infer(&frame)?;
          let elapsed_a = now.elapsed();
          output.render_result(&model.stage_view(&frame), &result)?;
          let elapsed_b = now.elapsed();
          info!(
            "第 {} 帧: {:?}, 耗时: {:.2?} / {:.2?}",
            frame_index, result, elapsed_a, elapsed_b
          );
        }
        // 坏帧只影响本帧，继续处理后续帧
        Err(e) => {
          rejected += 1;
          warn!("第 {} 帧无效，已跳过: {}", frame_index, e);
        }
      }
      now = std::time::Instant::now();

      if self.frame_number.map(|n| frame_index >= n).unwrap_or(false) {
        info!("达到指定帧数 {}, 退出任务循环", frame_index);
        break;
      }
      if rx.try_recv().is_ok() {
        warn!("中断信号接收，退出任务循环");
        break;
      }
    }

    info!("任务完成，共 {} 帧，其中 {} 帧无效", frame_index, rejected);
    Ok(())
  }
}
