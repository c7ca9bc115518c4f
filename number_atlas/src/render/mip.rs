// Copyright 2026 the Number Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A box-filtered mip chain with trilinear sampling.

use tiny_skia::Pixmap;

use crate::geometry::AtlasSize;

/// Premultiplied RGBA in `[0, 1]`.
pub(crate) type Texel = [f32; 4];

/// Successive 2x2 box-filtered reductions of a premultiplied bitmap, down to a
/// single pixel.
#[derive(Debug)]
pub(crate) struct MipChain {
    levels: Vec<Level>,
}

#[derive(Debug)]
struct Level {
    width: usize,
    height: usize,
    texels: Vec<Texel>,
}

impl Level {
    fn from_pixmap(pixmap: &Pixmap) -> Self {
        let texels = pixmap
            .data()
            .chunks_exact(4)
            .map(|px| {
                [
                    f32::from(px[0]) / 255.0,
                    f32::from(px[1]) / 255.0,
                    f32::from(px[2]) / 255.0,
                    f32::from(px[3]) / 255.0,
                ]
            })
            .collect();
        Self {
            width: pixmap.width() as usize,
            height: pixmap.height() as usize,
            texels,
        }
    }

    /// The next smaller level. Odd trailing rows and columns are folded into
    /// the last texel.
    fn reduce(&self) -> Self {
        let width = (self.width / 2).max(1);
        let height = (self.height / 2).max(1);
        let mut texels = Vec::with_capacity(width * height);
        for y in 0..height {
            let rows = (y * 2)..(y * 2 + 2).max(if y + 1 == height { self.height } else { 0 });
            for x in 0..width {
                let cols = (x * 2)..(x * 2 + 2).max(if x + 1 == width { self.width } else { 0 });
                let mut sum = [0.0; 4];
                let mut count = 0.0;
                for sy in rows.clone().filter(|&sy| sy < self.height) {
                    for sx in cols.clone().filter(|&sx| sx < self.width) {
                        let texel = self.texels[sy * self.width + sx];
                        for (acc, c) in sum.iter_mut().zip(texel) {
                            *acc += c;
                        }
                        count += 1.0;
                    }
                }
                texels.push(sum.map(|c| c / count));
            }
        }
        Self {
            width,
            height,
            texels,
        }
    }

    fn fetch(&self, x: isize, y: isize) -> Texel {
        let x = x.clamp(0, self.width as isize - 1) as usize;
        let y = y.clamp(0, self.height as isize - 1) as usize;
        self.texels[y * self.width + x]
    }

    /// Bilinear sample at continuous coordinates where texel centers sit on
    /// half-integers.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "coordinates are floored and clamped to the level size"
    )]
    fn bilinear(&self, u: f64, v: f64) -> Texel {
        let x = u - 0.5;
        let y = v - 0.5;
        let (x0, y0) = (x.floor(), y.floor());
        let (fx, fy) = ((x - x0) as f32, (y - y0) as f32);
        let (x0, y0) = (x0 as isize, y0 as isize);
        let top = lerp(self.fetch(x0, y0), self.fetch(x0 + 1, y0), fx);
        let bottom = lerp(self.fetch(x0, y0 + 1), self.fetch(x0 + 1, y0 + 1), fx);
        lerp(top, bottom, fy)
    }
}

impl MipChain {
    /// Builds the full chain of `base`.
    pub(crate) fn new(base: &Pixmap) -> Self {
        let mut levels = vec![Level::from_pixmap(base)];
        while let Some(last) = levels.last().filter(|l| l.width > 1 || l.height > 1) {
            let next = last.reduce();
            levels.push(next);
        }
        Self { levels }
    }

    /// Size of the base level.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "the base level was built from a pixmap with u32 dimensions"
    )]
    pub(crate) fn base_size(&self) -> AtlasSize {
        let base = &self.levels[0];
        AtlasSize::new(base.width as u32, base.height as u32)
    }

    /// Number of levels, the base included.
    pub(crate) fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Trilinear sample at base-level coordinates `(u, v)` and level of detail
    /// `lod`, where `lod` 0 is the base level and every step halves the size.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "the level index is clamped to the chain length"
    )]
    pub(crate) fn sample(&self, u: f64, v: f64, lod: f64) -> Texel {
        let max_level = (self.levels.len() - 1) as f64;
        let lod = lod.clamp(0.0, max_level);
        let lower = lod.floor();
        let blend = (lod - lower) as f32;
        let lower_index = lower as usize;

        let at = |index: usize| {
            let scale = f64::from(1_u32 << index.min(31));
            self.levels[index].bilinear(u / scale, v / scale)
        };
        let near = at(lower_index);
        if blend == 0.0 || lower_index + 1 >= self.levels.len() {
            near
        } else {
            lerp(near, at(lower_index + 1), blend)
        }
    }
}

fn lerp(a: Texel, b: Texel, t: f32) -> Texel {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}
