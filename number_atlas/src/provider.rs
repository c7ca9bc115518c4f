// Copyright 2026 the Number Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use std::sync::Arc;

use tiny_skia::Pixmap;

use crate::cache::{RasterizedFontCache, SubscriberId};
use crate::charset::CharacterSet;
use crate::config::FontStyleConfig;
use crate::error::Error;
use crate::geometry::{AtlasOffset, AtlasSize};
use crate::layout::{blank_layout, compute_layout};
use crate::number_font::NumberFont;
use crate::raster::{FontRasterizer, RasterizedFont};
use crate::render::AtlasRenderer;

/// One [`FontStyleConfig`] bound to a shared [`RasterizedFontCache`].
///
/// The provider is a single subscriber of the cache: every lookup it makes is
/// registered under its own [`SubscriberId`], and dropping it releases all of
/// them. Released entries are evicted by the cache's next scan.
///
/// Configs that are not renderable never touch the cache. They produce an
/// all-zero lookup table and a 1x1 transparent atlas.
pub struct NumberFontProvider<'a, R> {
    config: FontStyleConfig,
    cache: &'a RasterizedFontCache<R>,
    id: SubscriberId,
}

impl<R> fmt::Debug for NumberFontProvider<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumberFontProvider")
            .field("config", &self.config)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl<'a, R: FontRasterizer> NumberFontProvider<'a, R> {
    /// Creates a provider for `config` drawing from `cache`.
    pub fn new(config: FontStyleConfig, cache: &'a RasterizedFontCache<R>) -> Self {
        Self {
            config,
            cache,
            id: SubscriberId::next(),
        }
    }

    /// The bound config.
    pub fn config(&self) -> &FontStyleConfig {
        &self.config
    }

    /// The identity this provider subscribes to cache entries with.
    pub fn subscriber_id(&self) -> SubscriberId {
        self.id
    }

    /// The characters the atlas holds.
    pub fn character_set(&self) -> CharacterSet {
        self.config.character_set()
    }

    /// The rasterized font for the config, from the cache or freshly
    /// rasterized. `None` when the config is not renderable.
    pub fn rasterized_font(&self) -> Result<Option<Arc<RasterizedFont>>, Error> {
        self.rasterize(&self.character_set())
    }

    /// Size of the atlas [`render_atlas`](Self::render_atlas) produces.
    pub fn rotated_atlas_size(&self) -> Result<AtlasSize, Error> {
        Ok(match self.rasterized_font()? {
            Some(font) => AtlasRenderer::output_size(&self.config, &font),
            None => AtlasSize::new(1, 1),
        })
    }

    /// Computes the lookup table for an atlas placed at `offset`.
    pub fn create_number_font(&self, offset: AtlasOffset) -> Result<NumberFont, Error> {
        let chars = self.character_set();
        match self.rasterize(&chars)? {
            Some(font) => compute_layout(&font, &chars, &self.config, offset),
            None => Ok(blank_layout(&chars, &self.config)),
        }
    }

    /// Renders the styled, rotated atlas with `renderer`.
    pub fn render_atlas(&self, renderer: &AtlasRenderer) -> Result<Pixmap, Error> {
        match self.rasterized_font()? {
            Some(font) => renderer.render(&self.config, &font),
            None => AtlasRenderer::placeholder(),
        }
    }

    fn rasterize(&self, chars: &CharacterSet) -> Result<Option<Arc<RasterizedFont>>, Error> {
        let Some(font) = self.config.font().filter(|_| self.config.is_renderable()) else {
            return Ok(None);
        };
        self.cache
            .get_or_create(font, self.config.point_size(), &chars.extras_string(), self.id)
            .map(Some)
    }
}

impl<R> Drop for NumberFontProvider<'_, R> {
    fn drop(&mut self) {
        self.cache.release(self.id);
    }
}
