// Copyright 2026 the Number Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer pixel geometry shared by the rasterizer, layout and renderer.
//!
//! All rectangles use a top-left origin with y growing downwards, both before
//! and after rotation.

use crate::SUPER_SCALE;

/// Width and height of a bitmap in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct AtlasSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl AtlasSize {
    /// Creates a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The size with width and height exchanged.
    pub const fn transposed(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Divides both dimensions by [`SUPER_SCALE`], truncating.
    pub const fn downscaled(self) -> Self {
        Self {
            width: self.width / SUPER_SCALE,
            height: self.height / SUPER_SCALE,
        }
    }

    /// Whether either dimension is zero.
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Placement of the baked atlas inside the runtime renderer's destination
/// texture.
///
/// `x` is added to every glyph's left edge. `y` is the bottom edge the atlas is
/// anchored to; glyph tops are expressed relative to it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct AtlasOffset {
    /// Horizontal offset in pixels.
    pub x: i32,
    /// Vertical anchor in pixels.
    pub y: i32,
}

impl AtlasOffset {
    /// Creates a new offset.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// The bounding box of one glyph's image within an atlas.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GlyphRect {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl GlyphRect {
    /// Creates a new rectangle.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Divides every component by [`SUPER_SCALE`], truncating.
    ///
    /// Position and extent are truncated independently, so a glyph can lose up
    /// to `SUPER_SCALE - 1` super-sampled pixels per axis.
    pub const fn downscaled(self) -> Self {
        Self {
            x: self.x / SUPER_SCALE,
            y: self.y / SUPER_SCALE,
            width: self.width / SUPER_SCALE,
            height: self.height / SUPER_SCALE,
        }
    }

    /// Whether the rectangle covers no pixels.
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the pixel at `(x, y)` lies inside the rectangle.
    pub const fn contains(self, x: u32, y: u32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width && y < self.y + self.height
    }
}
