// 该文件是 GoalVision （球门视觉） 项目的一部分。
// src/input.rs - 图像输入
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

use image::RgbImage;
use image::imageops::{FilterType, resize};
use thiserror::Error;

use crate::{
  FromUrl,
  frame::{FrameError, RgbFrame},
};

#[cfg(feature = "read_image_file")]
mod read_image_file;
#[cfg(feature = "read_image_file")]
pub use self::read_image_file::{ImageFileInput, ImageFileInputError};

#[cfg(feature = "folder_input")]
mod folder_input;
#[cfg(feature = "folder_input")]
pub use self::folder_input::{FolderInput, FolderInputError};

#[derive(Error, Debug)]
pub enum InputError {
  #[cfg(feature = "read_image_file")]
  #[error("Image file input error: {0}")]
  ImageFileInputError(#[from] ImageFileInputError),
  #[cfg(feature = "folder_input")]
  #[error("Folder input error: {0}")]
  FolderInputError(#[from] FolderInputError),
  #[error("Frame error: {0}")]
  FrameError(#[from] FrameError),
  #[error("URI scheme mismatch")]
  SchemeMismatch,
}

/// 解码后的图像转为固定尺寸帧，`scale` 为真时先缩放到 `W`x`H`
pub(crate) fn to_frame<const W: u32, const H: u32>(
  image: RgbImage,
  scale: bool,
) -> Result<RgbFrame<W, H>, FrameError> {
  if scale && image.dimensions() != (W, H) {
    RgbFrame::try_from(resize(&image, W, H, FilterType::Triangle))
  } else {
    RgbFrame::try_from(image)
  }
}

pub enum InputWrapper<const W: u32, const H: u32> {
  #[cfg(feature = "read_image_file")]
  ReadImageFile(ImageFileInput<W, H>),
  #[cfg(feature = "folder_input")]
  Folder(FolderInput<W, H>),
}

impl<const W: u32, const H: u32> FromUrl for InputWrapper<W, H> {
  type Error = InputError;

  fn from_url(url: &url::Url) -> Result<Self, Self::Error> {
    #[cfg(feature = "read_image_file")]
    {
      use crate::FromUrlWithScheme;

      if url.scheme() == ImageFileInput::<W, H>::SCHEME {
        let input = ImageFileInput::from_url(url)?;
        return Ok(InputWrapper::ReadImageFile(input));
      }
    }
    #[cfg(feature = "folder_input")]
    {
      use crate::FromUrlWithScheme;

      if url.scheme() == FolderInput::<W, H>::SCHEME {
        let input = FolderInput::from_url(url)?;
        return Ok(InputWrapper::Folder(input));
      }
    }
    Err(InputError::SchemeMismatch)
  }
}

impl<const W: u32, const H: u32> Iterator for InputWrapper<W, H> {
  type Item = Result<RgbFrame<W, H>, InputError>;

  fn next(&mut self) -> Option<Self::Item> {
    match self {
      #[cfg(feature = "read_image_file")]
      InputWrapper::ReadImageFile(input) => input.next().map(|r| r.map_err(InputError::from)),
      #[cfg(feature = "folder_input")]
      InputWrapper::Folder(input) => input.next().map(|r| r.map_err(InputError::from)),
    }
  }
}
