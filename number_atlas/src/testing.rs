// Copyright 2026 the Number Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A deterministic rasterizer for unit tests: every glyph is a solid block
//! half as wide as it is tall, so tests need no font files.

use hashbrown::HashMap;
use tiny_skia::Pixmap;

use crate::config::SourceFont;
use crate::error::Error;
use crate::geometry::GlyphRect;
use crate::raster::{AtlasParams, DynamicFontAtlas, FontRasterizer, RasterizedFont};

/// The character the block font has no glyph for.
pub(crate) const MISSING: char = '\u{2603}';

/// A font whose data is never read. Every call returns a distinct identity.
pub(crate) fn block_font() -> SourceFont {
    SourceFont::from_bytes("Block", Vec::new(), 0)
}

#[derive(Debug, Default)]
pub(crate) struct BlockRasterizer;

impl BlockRasterizer {
    pub(crate) fn new() -> Self {
        Self
    }
}

impl FontRasterizer for BlockRasterizer {
    type Atlas = BlockAtlas;

    fn create_font_atlas(
        &mut self,
        _font: &SourceFont,
        params: &AtlasParams,
    ) -> Result<BlockAtlas, Error> {
        let pixmap = Pixmap::new(params.width, params.height)
            .ok_or_else(|| Error::surface_allocation(params.width, params.height))?;
        Ok(BlockAtlas {
            params: *params,
            pixmap,
            glyphs: HashMap::new(),
            cursor: (0, 0),
        })
    }
}

#[derive(Debug)]
pub(crate) struct BlockAtlas {
    params: AtlasParams,
    pixmap: Pixmap,
    glyphs: HashMap<char, GlyphRect>,
    cursor: (u32, u32),
}

impl DynamicFontAtlas for BlockAtlas {
    fn add_characters(&mut self, characters: &[char]) -> Result<(), Error> {
        let padding = self.params.padding;
        let height = self.params.point_size.max(1);
        let width = (height / 2).max(1);
        for &ch in characters {
            if self.glyphs.contains_key(&ch) {
                continue;
            }
            if ch == MISSING {
                return Err(Error::missing_glyph(ch));
            }
            let (slot_w, slot_h) = (width + 2 * padding, height + 2 * padding);
            if self.cursor.0 + slot_w > self.params.width {
                self.cursor = (0, self.cursor.1 + slot_h);
            }
            if self.cursor.1 + slot_h > self.params.height {
                return Err(Error::atlas_full(ch, self.params.width, self.params.height));
            }
            let rect = GlyphRect::new(
                self.cursor.0 + padding,
                self.cursor.1 + padding,
                width,
                height,
            );
            self.cursor.0 += slot_w;
            if ch == ' ' {
                self.glyphs.insert(ch, GlyphRect::default());
                continue;
            }
            let stride = self.pixmap.width() as usize;
            let data = self.pixmap.data_mut();
            for y in rect.y..rect.y + rect.height {
                let row = y as usize * stride;
                for x in rect.x..rect.x + rect.width {
                    let offset = (row + x as usize) * 4;
                    data[offset..offset + 4].copy_from_slice(&[255; 4]);
                }
            }
            self.glyphs.insert(ch, rect);
        }
        Ok(())
    }

    fn into_static(self) -> RasterizedFont {
        RasterizedFont::new(self.pixmap, self.glyphs, &self.params)
    }
}
