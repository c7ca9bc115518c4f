// Copyright 2026 the Number Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host rasterizer contract and the glyph atlas it produces.
//!
//! A [`FontRasterizer`] creates a [`DynamicFontAtlas`] for one font at one
//! super-sampled size. Characters are added to it, possibly in several
//! batches, and it is then frozen into an immutable [`RasterizedFont`]. The
//! freeze consumes the dynamic atlas, so no characters can be added once it
//! has happened.
//!
//! [`OutlineRasterizer`] is the bundled implementation.

pub(crate) mod distance_field;
mod outline;

use hashbrown::HashMap;
use tiny_skia::Pixmap;

use crate::config::SourceFont;
use crate::error::Error;
use crate::geometry::{AtlasSize, GlyphRect};

pub use outline::{OutlineAtlas, OutlineRasterizer};

/// How glyph coverage is stored in the atlas alpha channel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// Alpha is anti-aliased coverage.
    #[default]
    Coverage,
    /// Alpha encodes the signed distance to the outline, with 128 on the
    /// outline and a spread equal to the atlas padding on either side.
    DistanceField,
}

/// Parameters for creating a glyph atlas.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AtlasParams {
    /// Size in pixels per em, already multiplied by [`SUPER_SCALE`](crate::SUPER_SCALE).
    pub point_size: u32,
    /// Empty pixels kept around every glyph.
    pub padding: u32,
    /// Encoding of the alpha channel.
    pub render_mode: RenderMode,
    /// Atlas width in pixels.
    pub width: u32,
    /// Atlas height in pixels.
    pub height: u32,
}

impl AtlasParams {
    /// The atlas dimensions.
    pub fn size(&self) -> AtlasSize {
        AtlasSize::new(self.width, self.height)
    }
}

/// Creates glyph atlases from source fonts.
pub trait FontRasterizer {
    /// The atlas type in its dynamic population mode.
    type Atlas: DynamicFontAtlas;

    /// Allocates an empty atlas for `font`.
    fn create_font_atlas(
        &mut self,
        font: &SourceFont,
        params: &AtlasParams,
    ) -> Result<Self::Atlas, Error>;
}

/// A glyph atlas that still accepts characters.
pub trait DynamicFontAtlas {
    /// Rasterizes `characters` into the atlas. Characters already present are
    /// skipped.
    ///
    /// Fails if the font has no glyph for a character or the atlas has no room
    /// left for it.
    fn add_characters(&mut self, characters: &[char]) -> Result<(), Error>;

    /// Freezes the atlas.
    fn into_static(self) -> RasterizedFont;
}

/// A frozen glyph atlas: one super-sampled bitmap and a rectangle for every
/// character that was added.
#[derive(Debug)]
pub struct RasterizedFont {
    pixmap: Pixmap,
    glyphs: HashMap<char, GlyphRect>,
    point_size: u32,
    padding: u32,
    render_mode: RenderMode,
}

impl RasterizedFont {
    /// Assembles a frozen atlas from its parts.
    pub fn new(pixmap: Pixmap, glyphs: HashMap<char, GlyphRect>, params: &AtlasParams) -> Self {
        Self {
            pixmap,
            glyphs,
            point_size: params.point_size,
            padding: params.padding,
            render_mode: params.render_mode,
        }
    }

    /// The rectangle of `character` in super-sampled pixels.
    ///
    /// Asking for a character that was never added is an error rather than an
    /// empty rectangle.
    pub fn glyph_rect(&self, character: char) -> Result<GlyphRect, Error> {
        self.glyphs
            .get(&character)
            .copied()
            .ok_or_else(|| Error::missing_glyph(character))
    }

    /// Whether `character` was added.
    pub fn contains(&self, character: char) -> bool {
        self.glyphs.contains_key(&character)
    }

    /// Number of characters in the atlas.
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// The atlas bitmap.
    pub fn atlas(&self) -> &Pixmap {
        &self.pixmap
    }

    /// The atlas dimensions.
    pub fn atlas_size(&self) -> AtlasSize {
        AtlasSize::new(self.pixmap.width(), self.pixmap.height())
    }

    /// Super-sampled pixels per em.
    pub fn point_size(&self) -> u32 {
        self.point_size
    }

    /// Empty pixels kept around every glyph.
    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// Encoding of the alpha channel.
    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }
}
