// Copyright 2026 the Number Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The four orientations an atlas can be baked in.
//!
//! Every orientation is a composition of an optional axis swap followed by
//! optional mirrors along the output axes. Both the glyph rectangle mapping
//! and the bitmap resampling derive from the same [`Affine`], so a rectangle
//! mapped with [`RotationProps::rotated_glyph_rect`] always covers exactly the
//! pixels the resampler writes for it.

use peniko::kurbo::{Affine, Point, Rect};

use crate::geometry::{AtlasSize, GlyphRect};

/// Orientation of the baked atlas, as seen by the runtime renderer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FontRotation {
    /// Unrotated; digits read left to right.
    #[default]
    LeftToRight = 0,
    /// Rotated 90 degrees clockwise; digits read top to bottom.
    TopDown = 1,
    /// Rotated 90 degrees counter-clockwise; digits read bottom to top.
    BottomUp = 2,
    /// Rotated 180 degrees (a horizontal and a vertical mirror); digits read
    /// right to left, upside down.
    InvertedRightToLeft = 3,
}

impl FontRotation {
    /// Every orientation, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::LeftToRight,
        Self::TopDown,
        Self::BottomUp,
        Self::InvertedRightToLeft,
    ];

    /// The geometry of this orientation.
    pub fn props(self) -> &'static RotationProps {
        match self {
            Self::LeftToRight => &LEFT_TO_RIGHT,
            Self::TopDown => &TOP_DOWN,
            Self::BottomUp => &BOTTOM_UP,
            Self::InvertedRightToLeft => &INVERTED_RIGHT_TO_LEFT,
        }
    }
}

/// Geometry of one [`FontRotation`].
///
/// Output pixel coordinates are obtained from source pixel coordinates by
/// swapping the axes (if [`swaps_axes`](Self::swaps_axes)), then mirroring
/// across the output's vertical axis ([`flip_x`](Self::flip_x)) and/or its
/// horizontal axis ([`flip_y`](Self::flip_y)).
#[derive(Debug, PartialEq, Eq)]
pub struct RotationProps {
    orientation: FontRotation,
    quarter_turns: u8,
    swap_axes: bool,
    flip_x: bool,
    flip_y: bool,
    reverse_digits: bool,
}

static LEFT_TO_RIGHT: RotationProps = RotationProps {
    orientation: FontRotation::LeftToRight,
    quarter_turns: 0,
    swap_axes: false,
    flip_x: false,
    flip_y: false,
    reverse_digits: false,
};

static TOP_DOWN: RotationProps = RotationProps {
    orientation: FontRotation::TopDown,
    quarter_turns: 1,
    swap_axes: true,
    flip_x: true,
    flip_y: false,
    reverse_digits: false,
};

// The first digit ends up at the bottom, so a renderer advancing downwards
// has to walk the digits backwards.
static BOTTOM_UP: RotationProps = RotationProps {
    orientation: FontRotation::BottomUp,
    quarter_turns: 3,
    swap_axes: true,
    flip_x: false,
    flip_y: true,
    reverse_digits: true,
};

static INVERTED_RIGHT_TO_LEFT: RotationProps = RotationProps {
    orientation: FontRotation::InvertedRightToLeft,
    quarter_turns: 2,
    swap_axes: false,
    flip_x: true,
    flip_y: true,
    reverse_digits: true,
};

impl RotationProps {
    /// The orientation value carried into the output metadata.
    pub fn font_orientation(&self) -> FontRotation {
        self.orientation
    }

    /// Whether the runtime renderer must iterate digits in reverse to read
    /// them in order.
    pub fn reverse_digits(&self) -> bool {
        self.reverse_digits
    }

    /// Clockwise rotation angle in degrees.
    pub fn angle_degrees(&self) -> u32 {
        u32::from(self.quarter_turns) * 90
    }

    /// Whether width and height trade places.
    pub fn swaps_axes(&self) -> bool {
        self.swap_axes
    }

    /// Whether the output is mirrored left to right after the axis swap.
    pub fn flip_x(&self) -> bool {
        self.flip_x
    }

    /// Whether the output is mirrored top to bottom after the axis swap.
    pub fn flip_y(&self) -> bool {
        self.flip_y
    }

    /// Size of the rotated bitmap for a source bitmap of `size`.
    ///
    /// The mapping is its own inverse, so it also recovers the source size
    /// from a rotated size.
    pub fn rotated_size(&self, size: AtlasSize) -> AtlasSize {
        if self.swap_axes {
            size.transposed()
        } else {
            size
        }
    }

    /// Maps continuous pixel coordinates of a `source`-sized bitmap into the
    /// rotated bitmap.
    pub fn transform(&self, source: AtlasSize) -> Affine {
        let out = self.rotated_size(source);
        let swap = if self.swap_axes {
            Affine::new([0.0, 1.0, 1.0, 0.0, 0.0, 0.0])
        } else {
            Affine::IDENTITY
        };
        let flip_x = if self.flip_x {
            Affine::new([-1.0, 0.0, 0.0, 1.0, f64::from(out.width), 0.0])
        } else {
            Affine::IDENTITY
        };
        let flip_y = if self.flip_y {
            Affine::new([1.0, 0.0, 0.0, -1.0, 0.0, f64::from(out.height)])
        } else {
            Affine::IDENTITY
        };
        flip_y * flip_x * swap
    }

    /// Maps continuous pixel coordinates of the `rotated` bitmap back into
    /// the source bitmap.
    ///
    /// This is the transform the resampling stage evaluates at every output
    /// pixel center.
    pub fn sample_transform(&self, rotated: AtlasSize) -> Affine {
        self.transform(self.rotated_size(rotated)).inverse()
    }

    /// Maps a glyph rectangle of the source bitmap into the rotated bitmap.
    ///
    /// `rotated_container` is the size of the rotated bitmap the rectangle
    /// will live in.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "corners of an in-bounds rectangle map to in-bounds integer coordinates"
    )]
    pub fn rotated_glyph_rect(&self, rect: GlyphRect, rotated_container: AtlasSize) -> GlyphRect {
        let transform = self.transform(self.rotated_size(rotated_container));
        let p0 = transform * Point::new(f64::from(rect.x), f64::from(rect.y));
        let p1 = transform * Point::new(
            f64::from(rect.x) + f64::from(rect.width),
            f64::from(rect.y) + f64::from(rect.height),
        );
        let mapped = Rect::from_points(p0, p1);
        GlyphRect::new(
            mapped.x0.round().max(0.0) as u32,
            mapped.y0.round().max(0.0) as u32,
            mapped.width().round() as u32,
            mapped.height().round() as u32,
        )
    }
}
