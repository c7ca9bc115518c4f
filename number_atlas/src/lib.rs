// Copyright 2026 the Number Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Number Atlas bakes the ten decimal digits of a font, plus whatever literal
//! characters a numeric display format introduces, into a single styled and
//! rotated bitmap atlas with a lookup table describing where each glyph lives.
//!
//! The pipeline has four stages:
//!
//! - [`CharacterSet`] derives the glyphs to bake from a [`FontStyleConfig`]'s
//!   format string.
//! - [`RasterizedFontCache`] rasterizes those glyphs once per
//!   (font, size, character set) at 4x super-sampled resolution and shares the
//!   result between every config that asks for it.
//! - [`compute_layout`] turns glyph rectangles into the rotated, padded
//!   [`NumberFont`] lookup table.
//! - [`AtlasRenderer`] bakes the fill color into the super-sampled atlas and
//!   resamples it into the final rotated bitmap.
//!
//! [`NumberFontProvider`] ties the stages together for a single config.
//!
//! ```no_run
//! use number_atlas::{
//!     AtlasOffset, AtlasRenderer, FontStyleConfig, NumberFontProvider, OutlineRasterizer,
//!     RasterizedFontCache, SourceFont,
//! };
//!
//! # fn main() -> Result<(), number_atlas::Error> {
//! let bytes = std::fs::read("digits.ttf").unwrap();
//! let font = SourceFont::from_bytes("Digits", bytes, 0);
//!
//! let cache = RasterizedFontCache::new(OutlineRasterizer::new());
//! let config = FontStyleConfig::new(font).with_point_size(48).with_format("${0:N0}");
//! let provider = NumberFontProvider::new(config, &cache);
//!
//! let table = provider.create_number_font(AtlasOffset::new(0, 512))?;
//! let atlas = provider.render_atlas(&AtlasRenderer::new())?;
//! # let _ = (table, atlas);
//! # Ok(())
//! # }
//! ```

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use peniko;
pub use peniko::kurbo;
pub use tiny_skia::Pixmap;

mod cache;
mod charset;
mod config;
mod error;
pub mod format;
mod geometry;
mod layout;
mod number_font;
mod provider;
pub mod raster;
pub mod render;
mod rotation;

#[cfg(test)]
mod testing;

pub use cache::{CacheOptions, FontCacheKey, MAX_ATLAS_BYTES, RasterizedFontCache, SubscriberId};
pub use charset::{CharacterSet, DEFAULT_FORMAT, DIGITS};
pub use config::{FontStyleConfig, SourceFont};
pub use error::{Error, ErrorKind};
pub use geometry::{AtlasOffset, AtlasSize, GlyphRect};
pub use layout::{FONT_CHAR_PADDING, compute_layout};
pub use number_font::{ExtraChar, GlyphMetrics, NumberFont};
pub use provider::NumberFontProvider;
pub use raster::{OutlineRasterizer, RasterizedFont, RenderMode};
pub use render::AtlasRenderer;
pub use rotation::{FontRotation, RotationProps};

/// Linear scale between the rasterized atlas and the final atlas.
///
/// Glyphs are rasterized at `SUPER_SCALE` times the configured point size and
/// every glyph rectangle is divided by it (truncating) during layout.
pub const SUPER_SCALE: u32 = 4;
