// Copyright 2026 the Number Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sharing, subscription and eviction in the rasterized font cache.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use number_atlas::{
    ErrorKind, FontCacheKey, FontStyleConfig, NumberFontProvider, RasterizedFontCache, SubscriberId,
};

use crate::util::{BlockRasterizer, block_font};

#[test]
fn cache_shares_one_font_per_key() {
    let rasterizer = BlockRasterizer::new();
    let created = rasterizer.created();
    let cache = RasterizedFontCache::new(rasterizer);
    let font = block_font("Mono");

    let config = FontStyleConfig::new(font).with_point_size(12).with_format("{0:N0}");
    let recolored = config.clone().with_kerning(3).with_color(peniko::Color::BLACK);
    let a = NumberFontProvider::new(config, &cache);
    let b = NumberFontProvider::new(recolored, &cache);

    let first = a.rasterized_font().unwrap().unwrap();
    let second = b.rasterized_font().unwrap().unwrap();
    assert!(Arc::ptr_eq(&first, &second), "style does not affect the key");
    assert_eq!(created.load(Ordering::Relaxed), 1);
    assert_eq!((cache.hits(), cache.misses()), (1, 1));
    assert_eq!(cache.len(), 1);
}

#[test]
fn cache_separates_sizes_extras_and_fonts() {
    let cache = RasterizedFontCache::new(BlockRasterizer::new());
    let mono = block_font("Mono");
    let other = block_font("Mono");
    let id = SubscriberId::next();

    let base = cache.get_or_create(&mono, 12, "", id).unwrap();
    let bigger = cache.get_or_create(&mono, 16, "", id).unwrap();
    let extras = cache.get_or_create(&mono, 12, ",", id).unwrap();
    let renamed_twin = cache.get_or_create(&other, 12, "", id).unwrap();

    assert!(!Arc::ptr_eq(&base, &bigger));
    assert!(!Arc::ptr_eq(&base, &extras));
    assert!(
        !Arc::ptr_eq(&base, &renamed_twin),
        "fonts sharing a name are still distinct"
    );
    assert_eq!(cache.len(), 4);
    assert!(extras.contains(','));
    assert!(!base.contains(','));
}

#[test]
fn cache_subscription_is_idempotent() {
    let cache = RasterizedFontCache::new(BlockRasterizer::new());
    let font = block_font("Mono");
    let key = FontCacheKey::new(&font, 12, "");
    let id = SubscriberId::next();

    for _ in 0..3 {
        cache.get_or_create(&font, 12, "", id).unwrap();
    }
    assert_eq!(cache.subscriber_count(&key), Some(1));
    cache.release(id);
    assert_eq!(cache.subscriber_count(&key), Some(0));
}

#[test]
fn cache_evicts_on_next_lookup() {
    let cache = RasterizedFontCache::new(BlockRasterizer::new());
    let font = block_font("Mono");
    let key = FontCacheKey::new(&font, 12, "");
    let (a, b) = (SubscriberId::next(), SubscriberId::next());

    cache.get_or_create(&font, 12, "", a).unwrap();
    cache.get_or_create(&font, 12, "", b).unwrap();
    assert_eq!(cache.subscriber_count(&key), Some(2));

    cache.release(a);
    assert_eq!(cache.subscriber_count(&key), Some(1));
    cache.release(b);
    assert_eq!(cache.subscriber_count(&key), Some(0));
    assert_eq!(cache.len(), 1, "released entries linger until the next scan");

    let unrelated = block_font("Sans");
    cache.get_or_create(&unrelated, 20, "", SubscriberId::next()).unwrap();
    assert_eq!(cache.subscriber_count(&key), None);
    assert_eq!(cache.keys(), vec![FontCacheKey::new(&unrelated, 20, "")]);
}

#[test]
fn cache_reuses_unused_entry_when_found_first() {
    let rasterizer = BlockRasterizer::new();
    let created = rasterizer.created();
    let cache = RasterizedFontCache::new(rasterizer);
    let font = block_font("Mono");
    let key = FontCacheKey::new(&font, 12, "");

    let first = SubscriberId::next();
    cache.get_or_create(&font, 12, "", first).unwrap();
    cache.release(first);

    let second = SubscriberId::next();
    cache.get_or_create(&font, 12, "", second).unwrap();
    assert_eq!(created.load(Ordering::Relaxed), 1);
    assert_eq!(cache.subscriber_count(&key), Some(1));
}

#[test]
fn cache_sweep_and_clear() {
    let cache = RasterizedFontCache::new(BlockRasterizer::new());
    let font = block_font("Mono");
    let (kept, released) = (SubscriberId::next(), SubscriberId::next());
    cache.get_or_create(&font, 12, "", kept).unwrap();
    let handed_out = cache.get_or_create(&font, 14, "", released).unwrap();
    cache.release(released);

    assert_eq!(cache.sweep(), 1);
    assert_eq!(cache.keys(), vec![FontCacheKey::new(&font, 12, "")]);
    assert!(handed_out.glyph_count() > 0, "evicted fonts stay alive for holders");

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn cache_failed_rasterization_is_not_stored() {
    let cache = RasterizedFontCache::new(BlockRasterizer::without(&['$']));
    let font = block_font("Mono");
    let err = cache
        .get_or_create(&font, 12, "$,", SubscriberId::next())
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingGlyph);
    assert_eq!(err.character(), Some('$'));
    assert_eq!(err.font(), Some("Mono_12_$,"));
    assert!(cache.is_empty());
}

#[test]
fn cache_overfull_atlas_is_an_error() {
    let cache = RasterizedFontCache::new(BlockRasterizer::new());
    let font = block_font("Mono");
    // The 12pt atlas has room for 18 blocks; 10 digits and 17 extras do not fit.
    let err = cache
        .get_or_create(&font, 12, " abcdefghijklmnop", SubscriberId::next())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AtlasFull);
}

#[test]
fn cache_is_shared_across_threads() {
    let cache = RasterizedFontCache::new(BlockRasterizer::new());
    let font = block_font("Mono");
    let fonts: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    cache
                        .get_or_create(&font, 12, "", SubscriberId::next())
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(fonts.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(cache.misses(), 1);
    assert_eq!(cache.subscriber_count(&FontCacheKey::new(&font, 12, "")), Some(4));
}
