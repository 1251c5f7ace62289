// 该文件是 GoalVision （球门视觉） 项目的一部分。
// src/frame.rs - 固定尺寸 RGB 帧定义
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

use image::{DynamicImage, RgbImage};
use thiserror::Error;

const RGB_CHANNELS: usize = 3;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FrameError {
  #[error("数据长度不匹配: 期望长度 {expected}, 实际长度 {found}")]
  LengthMismatch { expected: usize, found: usize },
  #[error("图像尺寸不匹配: 期望 {expected_w}x{expected_h}, 实际 {found_w}x{found_h}")]
  SizeMismatch {
    expected_w: u32,
    expected_h: u32,
    found_w: u32,
    found_h: u32,
  },
  #[error("通道数不匹配: 期望 {expected}, 实际 {found}")]
  ChannelMismatch { expected: usize, found: usize },
}

/// 行优先、每通道 8 位的 RGB 帧，尺寸在类型上固定为 `W`x`H`。
///
/// 只能通过 `TryFrom` 构造，构造成功即说明尺寸与通道数都已校验。
#[derive(Debug, Clone)]
pub struct RgbFrame<const W: u32, const H: u32> {
  image: RgbImage,
}

impl<const W: u32, const H: u32> RgbFrame<W, H> {
  pub fn width(&self) -> u32 {
    W
  }

  pub fn height(&self) -> u32 {
    H
  }

  pub fn channels(&self) -> usize {
    RGB_CHANNELS
  }

  pub fn as_image(&self) -> &RgbImage {
    &self.image
  }

  pub fn as_nhwc(&self) -> &[u8] {
    self.image.as_raw()
  }

  pub fn into_image(self) -> RgbImage {
    self.image
  }
}

impl<const W: u32, const H: u32> Default for RgbFrame<W, H> {
  fn default() -> Self {
    Self {
      image: RgbImage::new(W, H),
    }
  }
}

impl<const W: u32, const H: u32> TryFrom<Vec<u8>> for RgbFrame<W, H> {
  type Error = FrameError;

  fn try_from(data: Vec<u8>) -> Result<Self, Self::Error> {
    let expected = RGB_CHANNELS * W as usize * H as usize;
    if data.len() != expected {
      return Err(FrameError::LengthMismatch {
        expected,
        found: data.len(),
      });
    }

    let image = RgbImage::from_raw(W, H, data).ok_or(FrameError::LengthMismatch {
      expected,
      found: 0,
    })?;
    Ok(Self { image })
  }
}

impl<const W: u32, const H: u32> TryFrom<RgbImage> for RgbFrame<W, H> {
  type Error = FrameError;

  fn try_from(image: RgbImage) -> Result<Self, Self::Error> {
    let (found_w, found_h) = image.dimensions();
    if (found_w, found_h) != (W, H) {
      return Err(FrameError::SizeMismatch {
        expected_w: W,
        expected_h: H,
        found_w,
        found_h,
      });
    }
    Ok(Self { image })
  }
}

impl<const W: u32, const H: u32> TryFrom<DynamicImage> for RgbFrame<W, H> {
  type Error = FrameError;

  // 只接受 8 位三通道图像，其余颜色格式一律视为输入错误，不做隐式转换
  fn try_from(image: DynamicImage) -> Result<Self, Self::Error> {
    match image {
      DynamicImage::ImageRgb8(rgb) => Self::try_from(rgb),
      other => Err(FrameError::ChannelMismatch {
        expected: RGB_CHANNELS,
        found: other.color().channel_count() as usize,
      }),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::{GrayImage, RgbaImage};

  #[test]
  fn accepts_exact_length_buffer() {
    let frame = RgbFrame::<4, 2>::try_from(vec![7u8; 4 * 2 * 3]).unwrap();
    assert_eq!(frame.width(), 4);
    assert_eq!(frame.height(), 2);
    assert_eq!(frame.as_nhwc().len(), 24);
  }

  #[test]
  fn rejects_short_buffer() {
    let err = RgbFrame::<4, 2>::try_from(vec![0u8; 10]).unwrap_err();
    assert_eq!(
      err,
      FrameError::LengthMismatch {
        expected: 24,
        found: 10
      }
    );
  }

  #[test]
  fn rejects_wrong_size_image() {
    let err = RgbFrame::<4, 2>::try_from(RgbImage::new(3, 2)).unwrap_err();
    assert!(matches!(err, FrameError::SizeMismatch { found_w: 3, .. }));
  }

  #[test]
  fn rejects_wrong_channel_count() {
    let gray = DynamicImage::ImageLuma8(GrayImage::new(4, 2));
    assert_eq!(
      RgbFrame::<4, 2>::try_from(gray).unwrap_err(),
      FrameError::ChannelMismatch {
        expected: 3,
        found: 1
      }
    );

    let rgba = DynamicImage::ImageRgba8(RgbaImage::new(4, 2));
    assert_eq!(
      RgbFrame::<4, 2>::try_from(rgba).unwrap_err(),
      FrameError::ChannelMismatch {
        expected: 3,
        found: 4
      }
    );
  }
}
