// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Size diagnostics for a [`CategoryCache`](crate::CategoryCache).

use core::fmt;

use crate::{Interval, RangeSet};

/// A snapshot of how much a cache stores.
///
/// Hosts can log this to judge compression quality: a well-behaved list has a
/// handful of categories and a small number of runs regardless of how many
/// positions are cached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of distinct categories.
    pub categories: usize,
    /// Total number of runs across all categories.
    pub runs: usize,
    /// Total number of cached positions.
    pub positions: usize,
}

impl CacheStats {
    /// Estimated heap and inline footprint of the stored runs, in bytes.
    ///
    /// This counts one [`Interval`] per run plus one [`RangeSet`] per category.
    /// Map node overhead is not included.
    #[must_use]
    pub const fn estimated_bytes(&self) -> usize {
        self.runs
            .saturating_mul(size_of::<Interval>())
            .saturating_add(self.categories.saturating_mul(size_of::<RangeSet>()))
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "categories={} runs={} positions={} bytes={}",
            self.categories,
            self.runs,
            self.positions,
            self.estimated_bytes()
        )
    }
}
