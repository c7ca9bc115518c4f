// Copyright 2026 the Number Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Utility functions and types shared across tests.

mod rasterizer;

pub(crate) use rasterizer::{BlockRasterizer, block_font};

use number_atlas::{AtlasOffset, FONT_CHAR_PADDING, GlyphMetrics, GlyphRect, NumberFont, Pixmap};

/// The glyph rectangle inside the atlas that `metrics` describes, with the
/// layout padding removed.
///
/// `offset` and `atlas_height` must be the values the metrics were computed
/// with.
pub(crate) fn atlas_rect(
    metrics: GlyphMetrics,
    offset: AtlasOffset,
    atlas_height: u32,
) -> GlyphRect {
    let x = metrics.x - offset.x + FONT_CHAR_PADDING;
    let y = metrics.y - offset.y + atlas_height as i32 - FONT_CHAR_PADDING;
    GlyphRect::new(
        x as u32,
        y as u32,
        (metrics.width - 2 * FONT_CHAR_PADDING) as u32,
        (metrics.height - 2 * FONT_CHAR_PADDING) as u32,
    )
}

/// Alpha of the pixel at the center of `rect`.
pub(crate) fn center_alpha(atlas: &Pixmap, rect: GlyphRect) -> u8 {
    atlas
        .pixel(rect.x + rect.width / 2, rect.y + rect.height / 2)
        .map(|p| p.alpha())
        .unwrap_or_else(|| panic!("{rect:?} lies outside the atlas"))
}

/// Every slot of `table` as metrics.
pub(crate) fn all_metrics(table: &NumberFont) -> Vec<GlyphMetrics> {
    (0..table.glyph_count())
        .map(|slot| table.glyph(slot).unwrap())
        .collect()
}
