// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-category run sets aggregated into offset queries.

use alloc::collections::BTreeMap;
use core::ops::Range;

use crate::category::scaled_extent;
use crate::{CacheStats, Category, RangeSet};

/// Maps dense positions `0..len` to a category, answering offset queries.
///
/// Each distinct category owns a [`RangeSet`] of the positions assigned to it.
/// The offset of a position is the sum, over every category, of
/// `extent * (positions in that category before it)`, so queries cost
/// `O(categories * runs)` instead of `O(positions)`.
///
/// The cache assumes:
///
/// - A position belongs to at most one category. Assigning a cached position
///   to a second category without truncating first double-counts it in every
///   offset after it. Debug builds assert on this in [`CategoryCache::put`].
/// - Cached positions form a dense prefix `0..len`. Offset queries for a
///   position after a gap ignore the gap, and [`CategoryCache::position_at_offset`]
///   reports `None` if its search lands on one. [`CategoryCache::is_dense`]
///   checks this.
#[derive(Clone, Debug)]
pub struct CategoryCache<C: Category> {
    sets: BTreeMap<C, RangeSet>,
    stats_changed: bool,
}

impl<C: Category> Default for CategoryCache<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Category> CategoryCache<C> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sets: BTreeMap::new(),
            stats_changed: false,
        }
    }

    /// Assigns `category` to `position`.
    ///
    /// Re-assigning the same category is a no-op. `position` must not already
    /// belong to a different category; truncate first to change it.
    pub fn put(&mut self, position: usize, category: C) {
        debug_assert!(
            category.extent() >= 0,
            "category extents must be non-negative; got {category:?}"
        );
        debug_assert!(
            !self
                .sets
                .iter()
                .any(|(other, set)| *other != category && set.contains(position)),
            "position {position} already belongs to another category"
        );
        self.sets.entry(category).or_default().insert(position);
        self.stats_changed = true;
    }

    /// Returns the start offset and category of `position`.
    ///
    /// Returns `None` if `position` is not cached.
    #[must_use]
    pub fn offset_and_category(&self, position: usize) -> Option<(i64, C)> {
        let mut offset = 0_i64;
        let mut found = None;
        // Every category contributes to the offset, so this never stops early.
        for (&category, set) in &self.sets {
            if set.contains(position) {
                found = Some(category);
            }
            let before = set.count_before(position);
            offset = offset.saturating_add(scaled_extent(category, before));
        }
        found.map(|category| (offset, category))
    }

    /// Returns the start offset of `position`, or `None` if it is not cached.
    #[must_use]
    pub fn offset_of(&self, position: usize) -> Option<i64> {
        self.offset_and_category(position).map(|(offset, _)| offset)
    }

    /// Returns the category of `position`, or `None` if it is not cached.
    #[must_use]
    pub fn category_of(&self, position: usize) -> Option<C> {
        self.sets
            .iter()
            .find(|(_, set)| set.contains(position))
            .map(|(&category, _)| category)
    }

    /// Returns the extent of `position`, or `None` if it is not cached.
    #[must_use]
    pub fn extent_of(&self, position: usize) -> Option<i64> {
        self.category_of(position).map(Category::extent)
    }

    /// Returns the position whose span `[start, start + extent)` contains `offset`.
    ///
    /// Returns `None` if the cache is empty, if `offset` is negative, if it
    /// lies at or past the end of the last cached position, or if the search
    /// hits a gap in the cached prefix.
    #[must_use]
    pub fn position_at_offset(&self, offset: i64) -> Option<usize> {
        if offset < 0 {
            return None;
        }
        let total = self.len();
        if total == 0 {
            return None;
        }

        // Smallest position whose end offset lies past `offset`.
        let (mut lo, mut hi) = (0, total);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let (start, category) = self.offset_and_category(mid)?;
            if start.saturating_add(category.extent()) <= offset {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }

        let (start, _) = self.offset_and_category(lo)?;
        (offset >= start).then_some(lo)
    }

    /// Returns the positions intersecting a viewport, as a half-open range.
    ///
    /// The viewport covers `[scroll_offset, scroll_offset + viewport_extent)`.
    /// Negative scroll offsets are clamped to zero, and a viewport reaching
    /// past the last cached position ends at [`CategoryCache::len`]. A
    /// non-positive `viewport_extent` yields an empty range at the first
    /// visible position.
    ///
    /// Returns `None` if the cache is empty or `scroll_offset` lies past the end.
    #[must_use]
    pub fn visible_positions(
        &self,
        scroll_offset: i64,
        viewport_extent: i64,
    ) -> Option<Range<usize>> {
        let top = scroll_offset.max(0);
        let start = self.position_at_offset(top)?;
        if viewport_extent <= 0 {
            return Some(start..start);
        }
        let bottom = top.saturating_add(viewport_extent - 1);
        let end = self
            .position_at_offset(bottom)
            .map_or(self.len(), |last| last + 1);
        Some(start..end.max(start))
    }

    /// Removes `position` and every position after it from all categories.
    ///
    /// Categories left without positions are kept; [`CategoryCache::clear`]
    /// drops them.
    pub fn truncate(&mut self, position: usize) {
        for set in self.sets.values_mut() {
            set.truncate(position);
        }
        self.stats_changed = true;
    }

    /// Removes every category and position.
    pub fn clear(&mut self) {
        self.sets.clear();
        self.stats_changed = true;
    }

    /// Total number of cached positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets
            .values()
            .fold(0_usize, |total, set| total.saturating_add(set.len()))
    }

    /// Returns `true` if no positions are cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.values().all(RangeSet::is_empty)
    }

    /// Sum of the extents of all cached positions.
    #[must_use]
    pub fn total_extent(&self) -> i64 {
        self.sets.iter().fold(0_i64, |total, (&category, set)| {
            total.saturating_add(scaled_extent(category, set.len()))
        })
    }

    /// Returns `true` if the cached positions are exactly `0..len`.
    ///
    /// Offset queries are only meaningful for a dense cache.
    #[must_use]
    pub fn is_dense(&self) -> bool {
        let len = self.len();
        self.sets
            .values()
            .filter_map(RangeSet::last)
            .all(|last| last < len)
    }

    /// Iterates over categories and their positions, in ascending category order.
    pub fn categories(&self) -> impl Iterator<Item = (C, &RangeSet)> {
        self.sets.iter().map(|(&category, set)| (category, set))
    }

    /// Computes the current size of the cache.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.sets.values().fold(
            CacheStats {
                categories: self.sets.len(),
                ..CacheStats::default()
            },
            |stats, set| CacheStats {
                runs: stats.runs + set.run_count(),
                positions: stats.positions.saturating_add(set.len()),
                ..stats
            },
        )
    }

    /// Returns the current size if the cache changed since the last call.
    ///
    /// Hosts that log cache size can call this after every layout pass and
    /// only emit a line when something was put, truncated, or cleared.
    pub fn take_changed_stats(&mut self) -> Option<CacheStats> {
        if !core::mem::take(&mut self.stats_changed) {
            return None;
        }
        Some(self.stats())
    }

    /// Emits the cache size as a `tracing` event if it changed since the last report.
    #[cfg(feature = "tracing")]
    pub fn log_stats(&mut self) {
        if let Some(stats) = self.take_changed_stats() {
            tracing::debug!(
                categories = stats.categories,
                runs = stats.runs,
                positions = stats.positions,
                bytes = stats.estimated_bytes(),
                "height cache size"
            );
        }
    }
}

impl<C: Category> Extend<(usize, C)> for CategoryCache<C> {
    fn extend<I: IntoIterator<Item = (usize, C)>>(&mut self, iter: I) {
        for (position, category) in iter {
            self.put(position, category);
        }
    }
}

impl<C: Category> FromIterator<(usize, C)> for CategoryCache<C> {
    fn from_iter<I: IntoIterator<Item = (usize, C)>>(iter: I) -> Self {
        let mut cache = Self::new();
        cache.extend(iter);
        cache
    }
}
