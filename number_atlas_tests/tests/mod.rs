// Copyright 2026 the Number Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate contains the integration test suite for `number_atlas`.
//!
//! - The `util` module contains the block-glyph rasterizer and the helpers shared by the
//!   different test modules. No font files are needed to run the suite.
//! - We do not use the default Rust test harness, but instead use this `mod.rs` file as the
//!   entry point to run all other tests, which makes the shared utilities easy to reach.
//! - If you want to add new tests, put them into the module matching their "topic" (cache,
//!   layout, render) or create a new one. End-to-end checks of a whole config go into
//!   `scenarios.rs`.
//! - For test naming, put the "topic" of the test at the start of the name, for example
//!   `cache_evicts_on_next_lookup` rather than `evicts_on_next_cache_lookup`.

#![allow(missing_docs, reason = "we don't need docs for testing")]
#![allow(clippy::cast_possible_truncation, reason = "not critical for testing")]

mod cache;
mod util;
