// Copyright 2026 the Number Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bakes a rasterized font into the final styled and rotated atlas bitmap.
//!
//! Rendering runs two stages over pooled temporary surfaces:
//!
//! 1. The fill color is baked into the super-sampled glyph coverage.
//! 2. The styled bitmap is rotated and downscaled by [`SUPER_SCALE`] with
//!    trilinear filtering over a box-filtered mip chain.
//!
//! [`SUPER_SCALE`]: crate::SUPER_SCALE

mod mip;
mod stage;
mod surface;

pub use surface::{SurfacePool, TemporarySurface};

use tiny_skia::Pixmap;

use crate::config::FontStyleConfig;
use crate::error::Error;
use crate::geometry::AtlasSize;
use crate::raster::RasterizedFont;
use mip::MipChain;
use stage::{ImageStage, RotateResample, StyleBake};

/// Renders atlases for [`FontStyleConfig`]s.
///
/// The renderer keeps a [`SurfacePool`] so consecutive renders of the same
/// size reuse their intermediate bitmaps. It is not `Sync`; use one renderer
/// per thread.
#[derive(Debug, Default)]
pub struct AtlasRenderer {
    pool: SurfacePool,
}

impl AtlasRenderer {
    /// Creates a renderer with an empty surface pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// The pool intermediate surfaces are drawn from.
    pub fn pool(&self) -> &SurfacePool {
        &self.pool
    }

    /// Size of the atlas [`render`](Self::render) produces for `font` in the
    /// orientation of `config`.
    pub fn output_size(config: &FontStyleConfig, font: &RasterizedFont) -> AtlasSize {
        config
            .rotation()
            .props()
            .rotated_size(font.atlas_size().downscaled())
    }

    /// Renders `font` with the color and orientation of `config`.
    ///
    /// The result is a premultiplied bitmap of
    /// [`output_size`](Self::output_size). Rendering the same inputs twice
    /// gives identical pixels.
    pub fn render(&self, config: &FontStyleConfig, font: &RasterizedFont) -> Result<Pixmap, Error> {
        let source = font.atlas_size();
        let output_size = Self::output_size(config, font);
        if output_size.is_empty() {
            return Err(Error::surface_allocation(output_size.width, output_size.height));
        }

        let chain = {
            let mut styled = self.pool.acquire(source.width, source.height)?;
            StyleBake {
                color: config.color(),
                render_mode: font.render_mode(),
                spread: font.padding(),
            }
            .run(font.atlas(), &mut styled);
            MipChain::new(&styled)
        };
        log::debug!(
            "rendering {}x{} atlas into {}x{} ({:?}, {} mip levels)",
            source.width,
            source.height,
            output_size.width,
            output_size.height,
            config.rotation(),
            chain.level_count(),
        );

        let mut rotated = self.pool.acquire(output_size.width, output_size.height)?;
        RotateResample {
            props: config.rotation().props(),
        }
        .run(&chain, &mut rotated);
        Ok(Pixmap::clone(&rotated))
    }

    /// The bitmap returned for configs that cannot be rendered: a single
    /// transparent pixel.
    pub fn placeholder() -> Result<Pixmap, Error> {
        Pixmap::new(1, 1).ok_or_else(|| Error::surface_allocation(1, 1))
    }
}
