// 该文件是 GoalVision （球门视觉） 项目的一部分。
// src/output/draw.rs - 检测结果叠加绘制
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

use ab_glyph::{FontRef, InvalidFont, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::model::{Region, Target};

// 文本渲染常量
const OFFSET_FONT_SIZE: f32 = 40.0;
const OFFSET_TEXT_X: i32 = 30;
const OFFSET_TEXT_Y: i32 = 10;
const OFFSET_TEXT_COLOR: [u8; 3] = [128, 0, 128];
const TARGET_BOX_COLOR: [u8; 3] = [255, 0, 0]; // 红色

pub struct Draw<'a> {
  font: FontRef<'a>,
  font_size: f32,
  text_origin: (i32, i32),
  text_color: [u8; 3],
  box_color: [u8; 3],
}

impl Draw<'static> {
  /// 使用内置字体
  pub fn new() -> Result<Self, InvalidFont> {
    let font_data: &'static [u8] = include_bytes!("../../assets/DejaVuSans.ttf");
    Ok(Self::with_font(FontRef::try_from_slice(font_data)?))
  }
}

impl<'a> Draw<'a> {
  pub fn with_font(font: FontRef<'a>) -> Self {
    Self {
      font,
      font_size: OFFSET_FONT_SIZE,
      text_origin: (OFFSET_TEXT_X, OFFSET_TEXT_Y),
      text_color: OFFSET_TEXT_COLOR,
      box_color: TARGET_BOX_COLOR,
    }
  }

  /// 画出目标框，并在左上角写出整数偏移
  pub fn draw_target(&self, image: &mut RgbImage, target: &Target) {
    self.draw_region(image, &target.region);

    let (x, y) = self.text_origin;
    draw_text_mut(
      image,
      Rgb(self.text_color),
      x,
      y,
      PxScale::from(self.font_size),
      &self.font,
      &target.offset_px().to_string(),
    );
  }

  // 边框加粗为 2 像素
  fn draw_region(&self, image: &mut RgbImage, region: &Region) {
    let color = Rgb(self.box_color);
    let (x, y) = (region.x as i32, region.y as i32);

    draw_hollow_rect_mut(image, Rect::at(x, y).of_size(region.width, region.height), color);

    if region.width > 2 && region.height > 2 {
      let inner = Rect::at(x + 1, y + 1).of_size(region.width - 2, region.height - 2);
      draw_hollow_rect_mut(image, inner, color);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn draws_two_pixel_box() {
    let draw = Draw::new().unwrap();
    let mut image = RgbImage::new(200, 200);
    let target = Target {
      region: Region::new(100, 120, 40, 30),
      offset: -2.0,
    };
    draw.draw_target(&mut image, &target);

    let red = Rgb(TARGET_BOX_COLOR);
    assert_eq!(image.get_pixel(100, 120), &red);
    assert_eq!(image.get_pixel(101, 121), &red);
    assert_eq!(image.get_pixel(139, 149), &red);
    assert_eq!(image.get_pixel(138, 148), &red);
    // 框内部不受影响
    assert_eq!(image.get_pixel(120, 135), &Rgb([0, 0, 0]));
  }

  #[test]
  fn writes_offset_text_near_top_left() {
    let draw = Draw::new().unwrap();
    let mut image = RgbImage::new(200, 200);
    let target = Target {
      region: Region::new(150, 150, 10, 10),
      offset: 88.0,
    };
    draw.draw_target(&mut image, &target);

    let touched = (OFFSET_TEXT_Y as u32..OFFSET_TEXT_Y as u32 + 40)
      .flat_map(|y| (OFFSET_TEXT_X as u32..OFFSET_TEXT_X as u32 + 60).map(move |x| (x, y)))
      .any(|(x, y)| image.get_pixel(x, y) != &Rgb([0, 0, 0]));
    assert!(touched);
  }
}
