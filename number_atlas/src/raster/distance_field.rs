// Copyright 2026 the Number Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Signed distance encoding of glyph coverage.
//!
//! Fields are computed with `sdfer`'s subpixel distance transform from the
//! anti-aliased coverage of each glyph. A distance `d` in pixels, positive
//! inside the outline, is stored as `0.5 + d / spread` in unorm8.

use sdfer::esdt::{self, ReusableBuffers};
use sdfer::{Image2d, Unorm8};
use tiny_skia::Pixmap;

use crate::geometry::GlyphRect;

/// Replaces the coverage of the glyph at `glyph` in `pixmap` by its distance
/// encoding.
///
/// The field extends `spread` pixels beyond the glyph on every side, so that
/// much padding must surround it. `buffers` carries scratch memory from one
/// glyph to the next.
pub(crate) fn encode_glyph(
    pixmap: &mut Pixmap,
    glyph: GlyphRect,
    spread: u32,
    buffers: &mut Option<ReusableBuffers>,
) {
    let fits = glyph.x >= spread
        && glyph.y >= spread
        && u64::from(glyph.x) + u64::from(glyph.width) + u64::from(spread)
            <= u64::from(pixmap.width())
        && u64::from(glyph.y) + u64::from(glyph.height) + u64::from(spread)
            <= u64::from(pixmap.height());
    if glyph.is_empty() || !fits {
        return;
    }
    let (w, h) = (glyph.width as usize, glyph.height as usize);
    let (x0, y0) = (glyph.x as usize, glyph.y as usize);
    let pad = spread as usize;
    let stride = pixmap.width() as usize;
    let data = pixmap.data_mut();

    let mut coverage = Image2d::<Unorm8>::from_fn(w, h, |x, y| {
        Unorm8::from_bits(data[((y0 + y) * stride + x0 + x) * 4 + 3])
    });
    let params = esdt::Params {
        pad,
        radius: spread.max(1) as f32,
        cutoff: 0.5,
        ..esdt::Params::default()
    };
    let (field, reuse) = esdt::glyph_to_sdf(&mut coverage, params, buffers.take());
    *buffers = Some(reuse);

    for y in 0..field.height() {
        let row = (y0 - pad + y) * stride;
        for x in 0..field.width() {
            let offset = (row + x0 - pad + x) * 4;
            data[offset..offset + 4].fill(field[(x, y)].to_bits());
        }
    }
}

/// Coverage in `[0, 1]` of a distance-encoded alpha value.
pub(crate) fn coverage(alpha: u8, spread: u32) -> f32 {
    let distance = (Unorm8::from_bits(alpha).decode() - 0.5) * spread.max(1) as f32;
    (distance + 0.5).clamp(0.0, 1.0)
}
