// 该文件是 GoalVision （球门视觉） 项目的一部分。
// src/model/contour.rs - 轮廓几何
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

use imageproc::point::Point;

use crate::model::Region;

/// 合并水平、竖直和对角直线段上的中间点，只保留拐点
pub fn simplify_chain(points: &[Point<i32>]) -> Vec<Point<i32>> {
  let mut simplified = Vec::with_capacity(points.len());
  simplify_chain_into(points, &mut simplified);
  simplified
}

/// 同 [`simplify_chain`]，结果写入 `out`，沿用其已有容量
pub fn simplify_chain_into(points: &[Point<i32>], out: &mut Vec<Point<i32>>) {
  out.clear();
  let n = points.len();
  if n < 3 {
    out.extend_from_slice(points);
    return;
  }

  let step = |from: Point<i32>, to: Point<i32>| (to.x - from.x, to.y - from.y);

  out.extend((0..n).filter_map(|i| {
    let prev = points[(i + n - 1) % n];
    let cur = points[i];
    let next = points[(i + 1) % n];
    (step(prev, cur) != step(cur, next)).then_some(cur)
  }));

  if out.is_empty() {
    out.push(points[0]);
  }
}

/// 轮廓多边形所围面积（鞋带公式，取绝对值）
pub fn contour_area(points: &[Point<i32>]) -> f64 {
  let n = points.len();
  if n < 3 {
    return 0.0;
  }

  let twice_area: i64 = (0..n)
    .map(|i| {
      let a = points[i];
      let b = points[(i + 1) % n];
      a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64
    })
    .sum();

  twice_area.abs() as f64 / 2.0
}

/// 面积的平方根，作为轮廓线性尺寸的近似
pub fn size_proxy(points: &[Point<i32>]) -> f64 {
  contour_area(points).sqrt()
}

/// 轮廓的轴对齐外接矩形，宽高按包含端点的像素数计算
pub fn bounding_region(points: &[Point<i32>]) -> Option<Region> {
  let first = points.first()?;
  let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);

  for p in &points[1..] {
    min_x = min_x.min(p.x);
    min_y = min_y.min(p.y);
    max_x = max_x.max(p.x);
    max_y = max_y.max(p.y);
  }

  if min_x < 0 || min_y < 0 {
    return None;
  }

  Some(Region::new(
    min_x as u32,
    min_y as u32,
    (max_x - min_x + 1) as u32,
    (max_y - min_y + 1) as u32,
  ))
}
