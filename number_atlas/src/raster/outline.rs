// Copyright 2026 the Number Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A rasterizer that fills glyph outlines extracted with Skrifa using
//! tiny-skia, packing them into the atlas with guillotiere.

use guillotiere::{AtlasAllocator, size2};
use hashbrown::HashMap;
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use sdfer::esdt::ReusableBuffers;
use skrifa::{FontRef, MetadataProvider};
use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Transform};

use super::{
    AtlasParams, DynamicFontAtlas, FontRasterizer, RasterizedFont, RenderMode, distance_field,
};
use crate::config::SourceFont;
use crate::error::Error;
use crate::geometry::GlyphRect;

/// Rasterizes outline glyphs (`glyf` or `CFF`) of any font Skrifa can read.
///
/// Glyphs are filled in white. In [`RenderMode::DistanceField`] the coverage
/// of every glyph, including its padding, is then replaced by its distance
/// encoding.
#[derive(Clone, Debug, Default)]
pub struct OutlineRasterizer {
    _private: (),
}

impl OutlineRasterizer {
    /// Creates a rasterizer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FontRasterizer for OutlineRasterizer {
    type Atlas = OutlineAtlas;

    fn create_font_atlas(
        &mut self,
        font: &SourceFont,
        params: &AtlasParams,
    ) -> Result<OutlineAtlas, Error> {
        // Fail on unreadable data now rather than on the first character.
        font_ref(font)?;
        let allocation_error = || Error::surface_allocation(params.width, params.height);
        let pixmap = Pixmap::new(params.width, params.height).ok_or_else(allocation_error)?;
        let width = i32::try_from(params.width).map_err(|_| allocation_error())?;
        let height = i32::try_from(params.height).map_err(|_| allocation_error())?;
        Ok(OutlineAtlas {
            font: font.clone(),
            params: *params,
            pixmap,
            allocator: AtlasAllocator::new(size2(width, height)),
            glyphs: HashMap::new(),
            sdf_buffers: None,
        })
    }
}

/// The dynamic atlas produced by [`OutlineRasterizer`].
pub struct OutlineAtlas {
    font: SourceFont,
    params: AtlasParams,
    pixmap: Pixmap,
    allocator: AtlasAllocator,
    glyphs: HashMap<char, GlyphRect>,
    sdf_buffers: Option<ReusableBuffers>,
}

impl core::fmt::Debug for OutlineAtlas {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OutlineAtlas")
            .field("font", &self.font.name())
            .field("params", &self.params)
            .field("glyphs", &self.glyphs.len())
            .finish_non_exhaustive()
    }
}

impl DynamicFontAtlas for OutlineAtlas {
    fn add_characters(&mut self, characters: &[char]) -> Result<(), Error> {
        let font = font_ref(&self.font)?;
        let charmap = font.charmap();
        let outlines = font.outline_glyphs();
        let size = Size::new(self.params.point_size as f32);
        let padding = self.params.padding;

        for &ch in characters {
            if self.glyphs.contains_key(&ch) {
                continue;
            }
            let outline = charmap
                .map(ch)
                .and_then(|id| outlines.get(id))
                .ok_or_else(|| Error::missing_glyph(ch))?;

            let mut pen = GlyphPen::default();
            outline
                .draw(DrawSettings::unhinted(size, LocationRef::default()), &mut pen)
                .map_err(|err| Error::invalid_font(self.font.name(), err))?;

            // Whitespace has no outline and takes no room.
            let Some(path) = pen.finish() else {
                log::trace!("{ch:?} has an empty outline");
                self.glyphs.insert(ch, GlyphRect::default());
                continue;
            };

            let bounds = path.bounds();
            let left = bounds.left().floor();
            let top = bounds.top().floor();
            let width = pixel_extent(left, bounds.right());
            let height = pixel_extent(top, bounds.bottom());
            let slot_width = width + 2 * padding;
            let slot_height = height + 2 * padding;

            let full = || Error::atlas_full(ch, self.params.width, self.params.height);
            let request = size2(
                i32::try_from(slot_width).map_err(|_| full())?,
                i32::try_from(slot_height).map_err(|_| full())?,
            );
            let allocation = self.allocator.allocate(request).ok_or_else(full)?;
            let slot_x = u32::try_from(allocation.rectangle.min.x).map_err(|_| full())?;
            let slot_y = u32::try_from(allocation.rectangle.min.y).map_err(|_| full())?;

            let mut paint = Paint::default();
            paint.set_color_rgba8(255, 255, 255, 255);
            paint.anti_alias = true;
            let transform = Transform::from_translate(
                (slot_x + padding) as f32 - left,
                (slot_y + padding) as f32 - top,
            );
            self.pixmap
                .fill_path(&path, &paint, FillRule::Winding, transform, None);

            let rect = GlyphRect::new(slot_x + padding, slot_y + padding, width, height);
            if self.params.render_mode == RenderMode::DistanceField {
                distance_field::encode_glyph(
                    &mut self.pixmap,
                    rect,
                    padding,
                    &mut self.sdf_buffers,
                );
            }
            log::trace!("rasterized {ch:?} into {rect:?}");
            self.glyphs.insert(ch, rect);
        }
        Ok(())
    }

    fn into_static(self) -> RasterizedFont {
        RasterizedFont::new(self.pixmap, self.glyphs, &self.params)
    }
}

fn font_ref(font: &SourceFont) -> Result<FontRef<'_>, Error> {
    FontRef::from_index(font.data().data.as_ref(), font.index())
        .map_err(|err| Error::invalid_font(font.name(), err))
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "glyph bounds are bounded by the atlas size"
)]
fn pixel_extent(start: f32, end: f32) -> u32 {
    (end.ceil() - start).max(0.0) as u32
}

/// Collects an outline into a tiny-skia path in y-down pixel space, with the
/// glyph origin at `(0, 0)`.
#[derive(Default)]
struct GlyphPen {
    open_path: PathBuilder,
}

impl GlyphPen {
    fn finish(self) -> Option<Path> {
        self.open_path.finish()
    }
}

impl OutlinePen for GlyphPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.open_path.move_to(x, -y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.open_path.line_to(x, -y);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.open_path.quad_to(cx0, -cy0, x, -y);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.open_path.cubic_to(cx0, -cy0, cx1, -cy1, x, -y);
    }

    fn close(&mut self) {
        self.open_path.close();
    }
}
