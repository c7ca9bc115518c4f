// Copyright 2026 the Number Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::Color;

use crate::charset::DIGITS;
use crate::rotation::FontRotation;

/// Placement of one glyph in the final atlas, padding included.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GlyphMetrics {
    /// Left edge, including the atlas offset.
    pub x: i32,
    /// Top edge relative to the bottom anchor of the atlas.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

/// A non-digit character and the lookup table slot holding its metrics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExtraChar {
    /// The literal character.
    pub character: char,
    /// Its slot, 10 or above.
    pub slot: usize,
}

/// The lookup table handed to the runtime renderer together with the atlas.
///
/// The four `char_*` vectors run in parallel: slots 0 through 9 hold the
/// digits, the slots listed in [`extras`](Self::extras) follow.
#[derive(Clone, Debug, PartialEq)]
pub struct NumberFont {
    /// Left edge of every slot.
    pub char_x: Vec<i32>,
    /// Top edge of every slot, relative to the bottom anchor.
    pub char_y: Vec<i32>,
    /// Width of every slot.
    pub char_width: Vec<i32>,
    /// Height of every slot.
    pub char_height: Vec<i32>,
    /// Slots of the non-digit characters, in slot order.
    pub extras: Vec<ExtraChar>,
    /// The atlas orientation.
    pub orientation: FontRotation,
    /// Whether digits must be drawn in reverse order.
    pub reverse_digits: bool,
    /// Extra gap between digits, in pixels.
    pub kerning: u32,
    /// The display format.
    pub format: String,
    /// Emission color, when emission is enabled.
    pub emission_color: Option<Color>,
    /// Specular parameters, when enabled: metallic in the red channel and
    /// smoothness in the alpha channel. Green and blue are always zero.
    pub specular_color: Option<Color>,
}

impl NumberFont {
    /// Number of slots.
    pub fn glyph_count(&self) -> usize {
        self.char_x.len()
    }

    /// The metrics stored in `slot`.
    pub fn glyph(&self, slot: usize) -> Option<GlyphMetrics> {
        Some(GlyphMetrics {
            x: *self.char_x.get(slot)?,
            y: *self.char_y.get(slot)?,
            width: *self.char_width.get(slot)?,
            height: *self.char_height.get(slot)?,
        })
    }

    /// The slot holding `character`.
    pub fn slot_for(&self, character: char) -> Option<usize> {
        DIGITS
            .iter()
            .position(|&d| d == character)
            .or_else(|| {
                self.extras
                    .iter()
                    .find(|extra| extra.character == character)
                    .map(|extra| extra.slot)
            })
    }

    /// The metrics of `character`.
    pub fn metrics_for(&self, character: char) -> Option<GlyphMetrics> {
        self.glyph(self.slot_for(character)?)
    }

    /// Whether every slot is all zeros, as produced for configs that cannot
    /// be rendered.
    pub fn is_blank(&self) -> bool {
        [&self.char_x, &self.char_y, &self.char_width, &self.char_height]
            .iter()
            .all(|values| values.iter().all(|&v| v == 0))
    }

    pub(crate) fn with_capacity(slots: usize) -> Self {
        Self {
            char_x: Vec::with_capacity(slots),
            char_y: Vec::with_capacity(slots),
            char_width: Vec::with_capacity(slots),
            char_height: Vec::with_capacity(slots),
            extras: Vec::new(),
            orientation: FontRotation::default(),
            reverse_digits: false,
            kerning: 0,
            format: String::new(),
            emission_color: None,
            specular_color: None,
        }
    }

    pub(crate) fn push(&mut self, metrics: GlyphMetrics) {
        self.char_x.push(metrics.x);
        self.char_y.push(metrics.y);
        self.char_width.push(metrics.width);
        self.char_height.push(metrics.height);
    }
}

/// Packs specular parameters into a color: metallic in red, smoothness in
/// alpha.
pub(crate) fn pack_specular(metallic: f32, smoothness: f32) -> Color {
    Color::new([metallic, 0.0, 0.0, smoothness])
}
