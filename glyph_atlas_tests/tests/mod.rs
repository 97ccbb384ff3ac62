// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate contains the integration test suite for `glyph_atlas`.
//!
//! - The `util` module holds the mock device, the mock rasterizer and sample builders shared
//!   by all tests.
//! - We do not use the default Rust test harness, but instead use this `mod.rs` file as the
//!   entry point to run all other tests, which makes the shared utilities easy to reach.
//! - For test naming, put the "topic" of the test at the start of the name, e.g.
//!   `append_keeps_existing_rectangles` rather than `keeps_existing_rectangles_on_append`.

#![allow(missing_docs, reason = "we don't need docs for testing")]
#![allow(clippy::cast_possible_truncation, reason = "not critical for testing")]

mod append;
mod util;
