// Copyright 2026 the Number Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The two image stages of atlas rendering.

use peniko::Color;
use peniko::kurbo::Point;
use tiny_skia::Pixmap;

use super::mip::{MipChain, Texel};
use crate::geometry::AtlasSize;
use crate::raster::{RenderMode, distance_field};
use crate::rotation::RotationProps;

/// A parameterized pixel transform from an input image into an output
/// bitmap.
///
/// Stages hold only their parameters, so the same instance can be run any
/// number of times and gives the same output for the same input.
pub(crate) trait ImageStage {
    /// The image the stage reads.
    type Input: ?Sized;

    /// Writes every pixel of `output`.
    fn run(&self, input: &Self::Input, output: &mut Pixmap);
}

/// Recolors glyph coverage with a fill color.
///
/// The input alpha is decoded according to `render_mode` into coverage. The
/// output is `color` with its alpha scaled by that coverage.
#[derive(Copy, Clone, Debug)]
pub(crate) struct StyleBake {
    /// The fill color.
    pub(crate) color: Color,
    /// How the input alpha encodes coverage.
    pub(crate) render_mode: RenderMode,
    /// Distance field spread, in input pixels.
    pub(crate) spread: u32,
}

impl ImageStage for StyleBake {
    type Input = Pixmap;

    fn run(&self, input: &Pixmap, output: &mut Pixmap) {
        let [r, g, b, a] = self.color.components.map(|c| c.clamp(0.0, 1.0));
        for (src, dst) in input
            .data()
            .chunks_exact(4)
            .zip(output.data_mut().chunks_exact_mut(4))
        {
            let coverage = match self.render_mode {
                RenderMode::Coverage => f32::from(src[3]) / 255.0,
                RenderMode::DistanceField => distance_field::coverage(src[3], self.spread),
            };
            let alpha = a * coverage;
            dst.copy_from_slice(&to_rgba8([r * alpha, g * alpha, b * alpha, alpha]));
        }
    }
}

/// Rotates and downscales a super-sampled atlas.
///
/// Every output pixel center is mapped back into the source with the
/// rotation's sampling transform and the mip chain is sampled trilinearly at
/// the level matching the scale between input and output.
#[derive(Copy, Clone, Debug)]
pub(crate) struct RotateResample {
    /// The rotation to apply.
    pub(crate) props: &'static RotationProps,
}

impl ImageStage for RotateResample {
    type Input = MipChain;

    fn run(&self, input: &MipChain, output: &mut Pixmap) {
        let out_size = AtlasSize::new(output.width(), output.height());
        let upright = self.props.rotated_size(out_size);
        let base = input.base_size();
        let scale_x = f64::from(base.width) / f64::from(upright.width.max(1));
        let scale_y = f64::from(base.height) / f64::from(upright.height.max(1));
        let lod = scale_x.max(scale_y).max(1.0).log2();
        let to_source = self.props.sample_transform(out_size);

        let width = out_size.width as usize;
        for (index, dst) in output.data_mut().chunks_exact_mut(4).enumerate() {
            let (x, y) = (index % width, index / width);
            let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            let source = to_source * center;
            let texel = input.sample(source.x * scale_x, source.y * scale_y, lod);
            dst.copy_from_slice(&to_rgba8(texel));
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "channels are clamped to the u8 range first"
)]
fn to_rgba8(texel: Texel) -> [u8; 4] {
    let alpha = (texel[3].clamp(0.0, 1.0) * 255.0).round();
    // Premultiplied channels may not exceed alpha.
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round().min(alpha) as u8;
    [channel(texel[0]), channel(texel[1]), channel(texel[2]), alpha as u8]
}
