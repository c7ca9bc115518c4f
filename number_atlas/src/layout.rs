// Copyright 2026 the Number Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turns rasterized glyph rectangles into the rotated, padded lookup table.

use crate::charset::CharacterSet;
use crate::config::FontStyleConfig;
use crate::error::Error;
use crate::geometry::AtlasOffset;
use crate::number_font::{ExtraChar, GlyphMetrics, NumberFont, pack_specular};
use crate::raster::RasterizedFont;
use crate::rotation::RotationProps;

/// Pixels added around every glyph in the lookup table, on each side.
pub const FONT_CHAR_PADDING: i32 = 1;

/// Computes the lookup table for `chars` as baked from `font` with the
/// orientation and style of `config`.
///
/// Each glyph rectangle is downscaled from super-sampled pixels (truncating),
/// mapped into the rotated atlas and grown by [`FONT_CHAR_PADDING`] on every
/// side. `offset.x` shifts every glyph right. Vertical positions are relative
/// to the bottom anchor `offset.y`, that is `y - rotated_height + offset.y`.
///
/// Fails if `font` lacks a glyph for any character of `chars`.
pub fn compute_layout(
    font: &RasterizedFont,
    chars: &CharacterSet,
    config: &FontStyleConfig,
    offset: AtlasOffset,
) -> Result<NumberFont, Error> {
    let props = config.rotation().props();
    let rotated = props.rotated_size(font.atlas_size().downscaled());
    let rotated_height = to_i32(rotated.height);

    let mut table = with_metadata(
        NumberFont::with_capacity(chars.slot_count()),
        chars,
        config,
        props,
    );
    for ch in chars.chars() {
        let rect = props.rotated_glyph_rect(font.glyph_rect(ch)?.downscaled(), rotated);
        let metrics = GlyphMetrics {
            x: offset.x + to_i32(rect.x) - FONT_CHAR_PADDING,
            y: to_i32(rect.y) + offset.y - rotated_height + FONT_CHAR_PADDING,
            width: to_i32(rect.width) + 2 * FONT_CHAR_PADDING,
            height: to_i32(rect.height) + 2 * FONT_CHAR_PADDING,
        };
        log::trace!("{ch:?} at {metrics:?}");
        table.push(metrics);
    }
    Ok(table)
}

/// The lookup table of a config that cannot be rendered: the right number of
/// slots, all zero.
pub(crate) fn blank_layout(chars: &CharacterSet, config: &FontStyleConfig) -> NumberFont {
    let props = config.rotation().props();
    let mut table = with_metadata(
        NumberFont::with_capacity(chars.slot_count()),
        chars,
        config,
        props,
    );
    for _ in 0..chars.slot_count() {
        table.push(GlyphMetrics::default());
    }
    table
}

fn with_metadata(
    mut table: NumberFont,
    chars: &CharacterSet,
    config: &FontStyleConfig,
    props: &RotationProps,
) -> NumberFont {
    table.extras = chars
        .extras()
        .iter()
        .enumerate()
        .map(|(i, &character)| ExtraChar {
            character,
            slot: crate::DIGITS.len() + i,
        })
        .collect();
    table.orientation = props.font_orientation();
    table.reverse_digits = props.reverse_digits();
    table.kerning = config.kerning();
    table.format = config.format().to_owned();
    table.emission_color = config.emission();
    table.specular_color = config
        .specular()
        .map(|(metallic, smoothness)| pack_specular(metallic, smoothness));
    table
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
