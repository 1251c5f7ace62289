// 该文件是 GoalVision （球门视觉） 项目的一部分。
// src/input/read_image_file.rs - 图像文件输入
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

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::{FrameError, RgbFrame},
  input::to_frame,
};

use image::{ImageReader, RgbImage};
use thiserror::Error;
use tracing::{error, info};
use url::Url;

#[derive(Error, Debug)]
pub enum ImageFileInputError {
  #[error("URI schema mismatch")]
  SchemaMismatch,
  #[error("I/O error: {0}")]
  IoError(#[from] std::io::Error),
  #[error("Image loading error: {0}")]
  ImageLoadError(#[from] image::ImageError),
}

/// 单张图像文件，只产生一帧
pub struct ImageFileInput<const W: u32, const H: u32> {
  image: Option<RgbImage>,
  scale: bool,
}

impl<const W: u32, const H: u32> FromUrlWithScheme for ImageFileInput<W, H> {
  const SCHEME: &'static str = "image";
}

impl<const W: u32, const H: u32> FromUrl for ImageFileInput<W, H> {
  type Error = ImageFileInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(ImageFileInputError::SchemaMismatch);
    }

    let path = url.path();
    let image = ImageReader::open(path)?.decode()?.into_rgb8();
    info!("读取图像文件: {} ({}x{})", path, image.width(), image.height());

    Ok(ImageFileInput {
      image: Some(image),
      scale: url.query_pairs().any(|(k, _)| k == "resize"),
    })
  }
}

impl<const W: u32, const H: u32> ImageFileInput<W, H> {
  pub fn from_image(image: RgbImage) -> Self {
    Self {
      image: Some(image),
      scale: false,
    }
  }

  pub fn with_resize(mut self, scale: bool) -> Self {
    self.scale = scale;
    self
  }
}

impl<const W: u32, const H: u32> Iterator for ImageFileInput<W, H> {
  type Item = Result<RgbFrame<W, H>, FrameError>;

  fn next(&mut self) -> Option<Self::Item> {
    let scale = self.scale;
    self.image.take().map(|image| to_frame(image, scale))
  }
}
