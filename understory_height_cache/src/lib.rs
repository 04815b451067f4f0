// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_height_cache --heading-base-level=0

//! Understory Height Cache: run-length compressed extents for dense index strips.
//!
//! Virtualized lists usually have thousands of rows but only two or three
//! distinct row heights. Storing one height per row wastes memory; this crate
//! instead stores, for each distinct *category* (such as a height), the set of
//! positions using it as a handful of runs.
//!
//! The core concepts are:
//!
//! - [`RangeSet`]: an ordered set of positions stored as disjoint, non-adjacent
//!   closed [`Interval`]s. Inserting positions next to an existing run grows it,
//!   so contiguous inserts in any order collapse into a single run.
//! - [`CategoryCache`]: one [`RangeSet`] per [`Category`], answering
//!   "where does position `p` start, and how tall is it?" and the inverse
//!   "which position covers offset `y`?" via binary search.
//! - [`CacheStats`]: run and category counts plus an estimated footprint, for
//!   hosts that want to log how well the cache compresses.
//!
//! This crate does not know about widgets or measurement. Host frameworks are
//! responsible for:
//!
//! - Measuring rows and feeding them in with [`CategoryCache::put`], keeping
//!   the cached positions a dense prefix `0..len`.
//! - Calling [`CategoryCache::truncate`] when rows from some index onward
//!   change, and [`CategoryCache::clear`] when everything does.
//! - Serializing access; the cache has no interior locking.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_height_cache::CategoryCache;
//!
//! let mut heights = CategoryCache::new();
//! for row in 0..100 {
//!     heights.put(row, if row % 10 == 0 { 40_u32 } else { 20 });
//! }
//!
//! // Rows 0 and 10 are 40 tall, rows 1..=9 are 20 tall.
//! assert_eq!(heights.offset_of(11), Some(2 * 40 + 9 * 20));
//! assert_eq!(heights.category_of(10), Some(40));
//!
//! // Offset 45 lies in row 1, which spans `40..60`.
//! assert_eq!(heights.position_at_offset(45), Some(1));
//! assert_eq!(heights.position_at_offset(-1), None);
//!
//! // Only a handful of runs are stored for 100 rows.
//! assert_eq!(heights.stats().runs, 20);
//!
//! // Rows 50 and later changed; drop them.
//! heights.truncate(50);
//! assert_eq!(heights.len(), 50);
//! assert_eq!(heights.category_of(50), None);
//! ```
//!
//! ## Features
//!
//! - `std` *(default)*: no-op; the crate is `no_std` and uses `alloc`.
//! - `tracing`: adds [`CategoryCache::log_stats`], which reports cache size as
//!   a `tracing` event.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cache;
mod category;
mod range_set;
mod stats;

pub use cache::CategoryCache;
pub use category::Category;
pub use range_set::{Interval, Positions, RangeSet};
pub use stats::CacheStats;
