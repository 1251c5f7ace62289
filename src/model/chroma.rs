// 该文件是 GoalVision （球门视觉） 项目的一部分。
// src/model/chroma.rs - 色度提取与二值化
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

/// 默认的 Cr 二值化阈值
pub const CR_THRESHOLD: u8 = 160;

// YCrCb 转换系数，14 位定点
const YCRCB_SHIFT: u32 = 14;
const LUMA_R: i32 = 4899; // 0.299
const LUMA_G: i32 = 9617; // 0.587
const LUMA_B: i32 = 1868; // 0.114
const CR_SCALE: i32 = 11682; // 0.713
const CHROMA_DELTA: i32 = 128 << YCRCB_SHIFT;

const FOREGROUND: u8 = 255;
const BACKGROUND: u8 = 0;

// 右移前加半个单位，四舍五入
fn descale(value: i32) -> i32 {
  (value + (1 << (YCRCB_SHIFT - 1))) >> YCRCB_SHIFT
}

/// 单个 RGB 像素的 Cr 分量
///
/// 先把亮度 Y 取整，再由 `R - Y` 计算 Cr，与常见 8 位 YCrCb 转换逐像素一致。
pub fn cr_value(r: u8, g: u8, b: u8) -> u8 {
  let (r, g, b) = (r as i32, g as i32, b as i32);
  let y = descale(LUMA_R * r + LUMA_G * g + LUMA_B * b);
  descale((r - y) * CR_SCALE + CHROMA_DELTA).clamp(0, 255) as u8
}

/// 将 `src` 的 Cr 通道写入 `dst`，两者尺寸必须一致
pub fn extract_cr_into(src: &RgbImage, dst: &mut GrayImage) {
  debug_assert_eq!(src.dimensions(), dst.dimensions());

  for (rgb, cr) in src.as_raw().chunks_exact(3).zip(dst.iter_mut()) {
    *cr = cr_value(rgb[0], rgb[1], rgb[2]);
  }
}

/// 固定阈值二值化，不小于 `threshold` 的像素为前景
pub fn threshold_into(src: &GrayImage, dst: &mut GrayImage, threshold: u8) {
  debug_assert_eq!(src.dimensions(), dst.dimensions());

  for (value, mask) in src.iter().zip(dst.iter_mut()) {
    *mask = if *value >= threshold {
      FOREGROUND
    } else {
      BACKGROUND
    };
  }
}
