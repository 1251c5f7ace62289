// 该文件是 GoalVision （球门视觉） 项目的一部分。
// src/input/folder_input.rs - 目录图像序列输入
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

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use image::ImageReader;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::{FrameError, RgbFrame},
  input::to_frame,
};

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

#[derive(Error, Debug)]
pub enum FolderInputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("图像解码错误 {path}: {source}")]
  Decode {
    path: PathBuf,
    source: image::ImageError,
  },
  #[error("帧错误 {path}: {source}")]
  Frame { path: PathBuf, source: FrameError },
}

/// 按文件名顺序逐张读取目录中的图像，模拟相机帧流
///
/// 每张图在取帧时才解码，单张坏图只影响对应的那一帧。
pub struct FolderInput<const W: u32, const H: u32> {
  files: VecDeque<PathBuf>,
  scale: bool,
}

impl<const W: u32, const H: u32> FromUrlWithScheme for FolderInput<W, H> {
  const SCHEME: &'static str = "folder";
}

impl<const W: u32, const H: u32> FromUrl for FolderInput<W, H> {
  type Error = FolderInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(FolderInputError::SchemeMismatch);
    }

    let scale = url.query_pairs().any(|(k, _)| k == "resize");
    Ok(Self::open(url.path())?.with_resize(scale))
  }
}

fn is_image_file(path: &Path) -> bool {
  path.is_file()
    && path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(|ext| {
        IMAGE_EXTENSIONS
          .iter()
          .any(|known| ext.eq_ignore_ascii_case(known))
      })
      .unwrap_or(false)
}

impl<const W: u32, const H: u32> FolderInput<W, H> {
  pub fn open<P: AsRef<Path>>(directory: P) -> Result<Self, FolderInputError> {
    let directory = directory.as_ref();
    let mut files = std::fs::read_dir(directory)?
      .map(|entry| entry.map(|e| e.path()))
      .collect::<Result<Vec<_>, _>>()?;
    files.retain(|path| is_image_file(path));
    files.sort();

    info!("图像目录 {} 中共有 {} 帧", directory.display(), files.len());

    Ok(Self {
      files: files.into(),
      scale: false,
    })
  }

  pub fn with_resize(mut self, scale: bool) -> Self {
    self.scale = scale;
    self
  }

  pub fn remaining(&self) -> usize {
    self.files.len()
  }

  fn load(&self, path: PathBuf) -> Result<RgbFrame<W, H>, FolderInputError> {
    debug!("读取帧: {}", path.display());
    let decoded = ImageReader::open(&path)
      .map_err(FolderInputError::IoError)?
      .decode();
    let image = match decoded {
      Ok(image) => image.into_rgb8(),
      Err(source) => return Err(FolderInputError::Decode { path, source }),
    };
    to_frame(image, self.scale).map_err(|source| FolderInputError::Frame { path, source })
  }
}

impl<const W: u32, const H: u32> Iterator for FolderInput<W, H> {
  type Item = Result<RgbFrame<W, H>, FolderInputError>;

  fn next(&mut self) -> Option<Self::Item> {
    let path = self.files.pop_front()?;
    Some(self.load(path))
  }
}
