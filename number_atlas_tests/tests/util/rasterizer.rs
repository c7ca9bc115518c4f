// Copyright 2026 the Number Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A font rasterizer that draws every glyph as a solid block.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use hashbrown::HashMap;
use number_atlas::raster::{AtlasParams, DynamicFontAtlas, FontRasterizer};
use number_atlas::{Error, GlyphRect, RasterizedFont, SourceFont};
use tiny_skia::{Paint, Pixmap, Rect, Transform};

/// A font with no data. Every call returns a font with a distinct identity.
pub(crate) fn block_font(name: &str) -> SourceFont {
    SourceFont::from_bytes(name, Vec::new(), 0)
}

/// Lays glyphs out in rows, each a block half as wide as the super-sampled
/// point size and as tall as it, surrounded by the atlas padding.
#[derive(Debug, Default)]
pub(crate) struct BlockRasterizer {
    missing: Vec<char>,
    created: Arc<AtomicUsize>,
}

impl BlockRasterizer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A rasterizer whose fonts have no glyph for any of `missing`.
    pub(crate) fn without(missing: &[char]) -> Self {
        Self {
            missing: missing.to_vec(),
            ..Self::default()
        }
    }

    /// Shared count of the atlases created so far.
    pub(crate) fn created(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.created)
    }
}

impl FontRasterizer for BlockRasterizer {
    type Atlas = BlockAtlas;

    fn create_font_atlas(
        &mut self,
        _font: &SourceFont,
        params: &AtlasParams,
    ) -> Result<BlockAtlas, Error> {
        self.created.fetch_add(1, Ordering::Relaxed);
        let pixmap = Pixmap::new(params.width, params.height)
            .ok_or_else(|| Error::surface_allocation(params.width, params.height))?;
        Ok(BlockAtlas {
            params: *params,
            missing: self.missing.clone(),
            pixmap,
            glyphs: HashMap::new(),
            pen: (0, 0),
        })
    }
}

#[derive(Debug)]
pub(crate) struct BlockAtlas {
    params: AtlasParams,
    missing: Vec<char>,
    pixmap: Pixmap,
    glyphs: HashMap<char, GlyphRect>,
    pen: (u32, u32),
}

impl DynamicFontAtlas for BlockAtlas {
    fn add_characters(&mut self, characters: &[char]) -> Result<(), Error> {
        let AtlasParams {
            point_size,
            padding,
            width,
            height,
            ..
        } = self.params;
        let glyph = (point_size / 2, point_size);
        let slot = (glyph.0 + 2 * padding, glyph.1 + 2 * padding);

        let mut paint = Paint::default();
        paint.set_color_rgba8(255, 255, 255, 255);
        for &ch in characters {
            if self.glyphs.contains_key(&ch) {
                continue;
            }
            if self.missing.contains(&ch) {
                return Err(Error::missing_glyph(ch));
            }
            if self.pen.0 + slot.0 > width {
                self.pen = (0, self.pen.1 + slot.1);
            }
            if self.pen.1 + slot.1 > height {
                return Err(Error::atlas_full(ch, width, height));
            }
            let rect = GlyphRect::new(self.pen.0 + padding, self.pen.1 + padding, glyph.0, glyph.1);
            self.pen.0 += slot.0;

            let fill = Rect::from_xywh(
                rect.x as f32,
                rect.y as f32,
                rect.width as f32,
                rect.height as f32,
            )
            .ok_or_else(|| Error::missing_glyph(ch))?;
            self.pixmap
                .fill_rect(fill, &paint, Transform::identity(), None);
            self.glyphs.insert(ch, rect);
        }
        Ok(())
    }

    fn into_static(self) -> RasterizedFont {
        RasterizedFont::new(self.pixmap, self.glyphs, &self.params)
    }
}
