// Copyright 2026 the Number Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared cache of rasterized fonts.
//!
//! Rasterizing a font is by far the most expensive step, so every config with
//! the same font, point size and extra characters shares one
//! [`RasterizedFont`]. Each entry tracks the subscribers using it. Entries
//! without subscribers are not dropped on release but on the next scan of the
//! cache, which happens on every lookup and on [`RasterizedFontCache::sweep`].

use core::fmt;
use core::num::NonZeroU64;
use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use smallvec::SmallVec;

use crate::SUPER_SCALE;
use crate::charset::DIGITS;
use crate::config::SourceFont;
use crate::error::Error;
use crate::raster::{AtlasParams, DynamicFontAtlas, FontRasterizer, RasterizedFont, RenderMode};

/// Smallest padding around a rasterized glyph, in super-sampled pixels.
const MIN_PADDING: u32 = 1;

/// Identifies one user of cached fonts, typically one provider.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(NonZeroU64);

impl SubscriberId {
    /// Returns an id that has never been returned before in this process.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        let id = NEXT.fetch_add(1, Ordering::Relaxed);
        Self(NonZeroU64::new(id).unwrap_or(NonZeroU64::MIN))
    }

    /// The raw id.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

/// Identity of a cache entry.
///
/// Fonts are identified by their data blob and face index rather than by
/// name, so distinct fonts that share a name never collide. The
/// [`Display`](fmt::Display) form is the human readable label
/// `name_pointSize_extras`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FontCacheKey {
    /// Unique identifier for the font blob.
    pub font_id: u64,
    /// Index within the font collection.
    pub font_index: u32,
    /// Display name of the font.
    pub font_name: Arc<str>,
    /// Point size in final atlas pixels.
    pub point_size: u32,
    /// Extra characters, concatenated in slot order.
    pub extras: String,
}

impl FontCacheKey {
    /// The key for `font` at `point_size` with `extras`.
    pub fn new(font: &SourceFont, point_size: u32, extras: &str) -> Self {
        Self {
            font_id: font.id(),
            font_index: font.index(),
            font_name: font.name().into(),
            point_size,
            extras: extras.to_owned(),
        }
    }
}

impl fmt::Display for FontCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.font_name, self.point_size, self.extras)
    }
}

/// Settings for a [`RasterizedFontCache`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheOptions {
    /// Alpha encoding requested from the rasterizer.
    pub render_mode: RenderMode,
}

impl CacheOptions {
    /// Sets the alpha encoding requested from the rasterizer.
    pub fn with_render_mode(mut self, render_mode: RenderMode) -> Self {
        self.render_mode = render_mode;
        self
    }
}

struct CacheEntry {
    key: FontCacheKey,
    font: Arc<RasterizedFont>,
    subscribers: SmallVec<[SubscriberId; 4]>,
}

impl CacheEntry {
    fn subscribe(&mut self, subscriber: SubscriberId) {
        if !self.subscribers.contains(&subscriber) {
            self.subscribers.push(subscriber);
        }
    }

    fn unsubscribe(&mut self, subscriber: SubscriberId) {
        self.subscribers.retain(|s| *s != subscriber);
    }

    fn is_unused(&self) -> bool {
        self.subscribers.is_empty()
    }
}

struct CacheState<R> {
    rasterizer: R,
    entries: Vec<CacheEntry>,
    hits: u64,
    misses: u64,
}

/// Rasterized fonts shared between subscribers.
///
/// All operations take `&self`; the entries and the rasterizer sit behind one
/// mutex, which is held for the duration of a rasterization.
pub struct RasterizedFontCache<R> {
    options: CacheOptions,
    state: Mutex<CacheState<R>>,
}

impl<R> fmt::Debug for RasterizedFontCache<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("RasterizedFontCache")
            .field("options", &self.options)
            .field("entries", &state.entries.len())
            .field("hits", &state.hits)
            .field("misses", &state.misses)
            .finish_non_exhaustive()
    }
}

impl<R: FontRasterizer> RasterizedFontCache<R> {
    /// Creates an empty cache with default options.
    pub fn new(rasterizer: R) -> Self {
        Self::with_options(rasterizer, CacheOptions::default())
    }

    /// Creates an empty cache.
    pub fn with_options(rasterizer: R, options: CacheOptions) -> Self {
        Self {
            options,
            state: Mutex::new(CacheState {
                rasterizer,
                entries: Vec::new(),
                hits: 0,
                misses: 0,
            }),
        }
    }

    /// Returns the font for `(font, point_size, extras)`, rasterizing it on
    /// first use, and subscribes `requester` to it.
    ///
    /// Unused entries passed over while searching are evicted.
    pub fn get_or_create(
        &self,
        font: &SourceFont,
        point_size: u32,
        extras: &str,
        requester: SubscriberId,
    ) -> Result<Arc<RasterizedFont>, Error> {
        let key = FontCacheKey::new(font, point_size, extras);
        let mut state = self.lock();

        let mut index = 0;
        while index < state.entries.len() {
            let entry = &mut state.entries[index];
            if entry.key == key {
                entry.subscribe(requester);
                let found = Arc::clone(&entry.font);
                state.hits += 1;
                log::debug!("font cache hit for `{key}`");
                return Ok(found);
            }
            if entry.is_unused() {
                let evicted = state.entries.remove(index);
                log::debug!("evicted unused font `{}`", evicted.key);
            } else {
                index += 1;
            }
        }

        state.misses += 1;
        let params = atlas_params(point_size, self.options.render_mode)
            .map_err(|err| err.in_font(key.to_string()))?;
        log::debug!(
            "rasterizing `{key}` into a {}x{} atlas with padding {}",
            params.width,
            params.height,
            params.padding
        );
        let extra_chars: SmallVec<[char; 8]> = extras.chars().collect();
        let rasterized = rasterize(&mut state.rasterizer, font, &params, &extra_chars)
            .map_err(|err| err.in_font(key.to_string()))?;

        let rasterized = Arc::new(rasterized);
        let mut subscribers = SmallVec::new();
        subscribers.push(requester);
        state.entries.push(CacheEntry {
            key,
            font: Arc::clone(&rasterized),
            subscribers,
        });
        Ok(rasterized)
    }
}

impl<R> RasterizedFontCache<R> {
    /// The options this cache was created with.
    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    /// Unsubscribes `requester` from every entry.
    ///
    /// Entries left without subscribers stay cached until the next scan.
    pub fn release(&self, requester: SubscriberId) {
        let mut state = self.lock();
        for entry in &mut state.entries {
            entry.unsubscribe(requester);
        }
    }

    /// Evicts every entry without subscribers, returning how many were evicted.
    pub fn sweep(&self) -> usize {
        let mut state = self.lock();
        let before = state.entries.len();
        state.entries.retain(|entry| {
            if entry.is_unused() {
                log::debug!("evicted unused font `{}`", entry.key);
            }
            !entry.is_unused()
        });
        before - state.entries.len()
    }

    /// Drops every entry, subscribed or not.
    ///
    /// Fonts already handed out stay alive until their last `Arc` is dropped.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    /// Number of cached fonts.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether no fonts are cached.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Keys of the cached fonts, oldest first.
    pub fn keys(&self) -> Vec<FontCacheKey> {
        self.lock().entries.iter().map(|e| e.key.clone()).collect()
    }

    /// Number of subscribers of the entry for `key`, if it is cached.
    pub fn subscriber_count(&self, key: &FontCacheKey) -> Option<usize> {
        self.lock()
            .entries
            .iter()
            .find(|e| e.key == *key)
            .map(|e| e.subscribers.len())
    }

    /// Number of lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.lock().hits
    }

    /// Number of lookups that rasterized a new font.
    pub fn misses(&self) -> u64 {
        self.lock().misses
    }

    fn lock(&self) -> MutexGuard<'_, CacheState<R>> {
        // Entries are only mutated in single steps, so a panic elsewhere cannot
        // leave them inconsistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Largest super-sampled atlas, in bytes, that the cache asks a rasterizer
/// for. Larger point sizes fail with [`ErrorKind::SurfaceAllocation`].
///
/// [`ErrorKind::SurfaceAllocation`]: crate::ErrorKind::SurfaceAllocation
pub const MAX_ATLAS_BYTES: u64 = 1 << 28;

/// Padding and square atlas size for glyphs rendered at `point_size`.
///
/// The atlas is large enough for the digits and a typical handful of extra
/// characters. It is a heuristic, not a bound: very wide glyphs or many extras
/// can still overflow it. Atlases above [`MAX_ATLAS_BYTES`] are refused.
pub(crate) fn atlas_params(
    point_size: u32,
    render_mode: RenderMode,
) -> Result<AtlasParams, Error> {
    let too_large = || Error::atlas_too_large(point_size, MAX_ATLAS_BYTES);
    let super_size = point_size.checked_mul(SUPER_SCALE).ok_or_else(too_large)?;
    let padding = super_size.div_ceil(15).max(MIN_PADDING);
    let dimension = point_size
        .checked_add(padding)
        .and_then(|size| size.checked_mul(3 * SUPER_SCALE))
        .ok_or_else(too_large)?;
    let bytes = u64::from(dimension) * u64::from(dimension) * 4;
    if bytes > MAX_ATLAS_BYTES {
        return Err(too_large());
    }
    Ok(AtlasParams {
        point_size: super_size,
        padding,
        render_mode,
        width: dimension,
        height: dimension,
    })
}

fn rasterize<R: FontRasterizer>(
    rasterizer: &mut R,
    font: &SourceFont,
    params: &AtlasParams,
    extras: &[char],
) -> Result<RasterizedFont, Error> {
    let mut atlas = rasterizer.create_font_atlas(font, params)?;
    atlas.add_characters(&DIGITS)?;
    if !extras.is_empty() {
        atlas.add_characters(extras)?;
    }
    Ok(atlas.into_static())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::testing::{BlockRasterizer, block_font};

    #[test]
    fn padding_and_dimension() {
        let params = atlas_params(90, RenderMode::Coverage).unwrap();
        assert_eq!(params.padding, 24);
        assert_eq!(params.width, 1368);
        assert_eq!(params.height, 1368);
        assert_eq!(params.point_size, 360);

        let params = atlas_params(8, RenderMode::Coverage).unwrap();
        assert_eq!(params.padding, 3, "32 / 15 rounds up");
        assert_eq!(atlas_params(0, RenderMode::Coverage).unwrap().padding, 1);
    }

    #[test]
    fn oversized_atlases_are_refused() {
        // 530pt needs 8064x8064 pixels, 540pt needs 8208x8208.
        let params = atlas_params(530, RenderMode::Coverage).unwrap();
        assert_eq!(params.width, 8064);
        assert!(u64::from(params.width).pow(2) * 4 <= MAX_ATLAS_BYTES);

        for point_size in [540, 200_000, u32::MAX] {
            let err = atlas_params(point_size, RenderMode::Coverage).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::SurfaceAllocation);
            let detail = err.detail().unwrap();
            assert!(detail.contains(&format!("point size {point_size}")), "{detail}");
        }
    }

    #[test]
    fn huge_point_size_fails_without_allocating() {
        let cache = RasterizedFontCache::new(BlockRasterizer::new());
        let font = block_font();
        let err = cache
            .get_or_create(&font, 200_000, "", SubscriberId::next())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SurfaceAllocation);
        assert_eq!(err.font(), Some("Block_200000_"));
        assert!(cache.is_empty());
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn same_key_shares_one_font() {
        let cache = RasterizedFontCache::new(BlockRasterizer::new());
        let font = block_font();
        let (a, b) = (SubscriberId::next(), SubscriberId::next());

        let first = cache.get_or_create(&font, 16, "$,", a).unwrap();
        let second = cache.get_or_create(&font, 16, "$,", b).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 1);
        let key = FontCacheKey::new(&font, 16, "$,");
        assert_eq!(cache.subscriber_count(&key), Some(2));
        assert_eq!(key.to_string(), "Block_16_$,");
    }

    #[test]
    fn subscribing_twice_is_idempotent() {
        let cache = RasterizedFontCache::new(BlockRasterizer::new());
        let font = block_font();
        let a = SubscriberId::next();
        cache.get_or_create(&font, 16, "", a).unwrap();
        cache.get_or_create(&font, 16, "", a).unwrap();
        assert_eq!(cache.subscriber_count(&FontCacheKey::new(&font, 16, "")), Some(1));
    }

    #[test]
    fn distinct_fonts_with_one_name_do_not_collide() {
        let cache = RasterizedFontCache::new(BlockRasterizer::new());
        let a = SubscriberId::next();
        let first = cache.get_or_create(&block_font(), 16, "", a).unwrap();
        let second = cache.get_or_create(&block_font(), 16, "", a).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn release_defers_eviction_to_next_scan() {
        let cache = RasterizedFontCache::new(BlockRasterizer::new());
        let font = block_font();
        let a = SubscriberId::next();
        cache.get_or_create(&font, 16, "", a).unwrap();
        cache.release(a);
        assert_eq!(cache.len(), 1, "still cached after release");

        cache.get_or_create(&font, 20, "", a).unwrap();
        assert_eq!(cache.keys(), vec![FontCacheKey::new(&font, 20, "")]);
    }

    #[test]
    fn unused_entry_matching_the_lookup_is_reused() {
        let cache = RasterizedFontCache::new(BlockRasterizer::new());
        let font = block_font();
        let a = SubscriberId::next();
        let first = cache.get_or_create(&font, 16, "", a).unwrap();
        cache.release(a);
        let again = cache.get_or_create(&font, 16, "", a).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn sweep_and_clear() {
        let cache = RasterizedFontCache::new(BlockRasterizer::new());
        let font = block_font();
        let (a, b) = (SubscriberId::next(), SubscriberId::next());
        cache.get_or_create(&font, 16, "", a).unwrap();
        cache.get_or_create(&font, 24, "", b).unwrap();
        cache.release(a);
        assert_eq!(cache.sweep(), 1);
        assert_eq!(cache.keys(), vec![FontCacheKey::new(&font, 24, "")]);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn rasterizer_errors_carry_the_key_and_are_not_cached() {
        let cache = RasterizedFontCache::new(BlockRasterizer::new());
        let font = block_font();
        let err = cache
            .get_or_create(&font, 16, "\u{2603}", SubscriberId::next())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingGlyph);
        assert_eq!(err.character(), Some('\u{2603}'));
        assert_eq!(err.font(), Some("Block_16_\u{2603}"));
        assert!(cache.is_empty());
    }

    #[test]
    fn subscriber_ids_are_unique() {
        let a = SubscriberId::next();
        let b = SubscriberId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }
}
