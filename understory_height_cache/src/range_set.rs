// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A run-length compressed set of positions.

use core::iter::FusedIterator;

use smallvec::SmallVec;

/// Number of runs stored inline before a [`RangeSet`] spills to the heap.
///
/// Most categories in a virtualized list end up with very few runs, so a
/// small inline buffer avoids an allocation per category.
const INLINE_RUNS: usize = 4;

/// A closed range of positions `[first, last]`, both inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval {
    /// First position in the run (inclusive).
    pub first: usize,
    /// Last position in the run (inclusive).
    pub last: usize,
}

impl Interval {
    /// Creates the interval `[first, last]`.
    #[must_use]
    pub const fn new(first: usize, last: usize) -> Self {
        debug_assert!(first <= last, "Interval bounds must be ordered");
        Self { first, last }
    }

    /// Creates the interval containing only `position`.
    #[must_use]
    pub const fn single(position: usize) -> Self {
        Self {
            first: position,
            last: position,
        }
    }

    /// Number of positions in the interval.
    ///
    /// Saturates for the full `0..=usize::MAX` range.
    #[must_use]
    pub const fn len(&self) -> usize {
        (self.last - self.first).saturating_add(1)
    }

    /// Returns `true` if `position` lies within the interval.
    #[must_use]
    pub const fn contains(&self, position: usize) -> bool {
        self.first <= position && position <= self.last
    }

    /// Returns `true` if `other` starts at or before the position right after `self`.
    ///
    /// Assumes `self.first <= other.first`.
    const fn touches(&self, other: &Self) -> bool {
        self.last.saturating_add(1) >= other.first
    }
}

/// An ordered set of positions stored as disjoint, non-adjacent [`Interval`]s.
///
/// Runs are kept strictly increasing. Two runs `[a, b]` and `[c, d]` never
/// satisfy `b + 1 >= c`; such runs are merged as soon as they appear, so
/// storage is proportional to the number of runs rather than the number of
/// positions.
///
/// ```rust
/// use understory_height_cache::RangeSet;
///
/// let mut set = RangeSet::new();
/// for position in (0..100).step_by(2) {
///     set.insert(position);
/// }
/// assert_eq!(set.run_count(), 50);
///
/// for position in (1..100).step_by(2) {
///     set.insert(position);
/// }
/// assert_eq!(set.run_count(), 1);
/// assert_eq!(set.len(), 100);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RangeSet {
    runs: SmallVec<[Interval; INLINE_RUNS]>,
}

impl RangeSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            runs: SmallVec::new(),
        }
    }

    /// Adds `position` to the set.
    ///
    /// Returns `true` if the position was not already present. Extending a run
    /// coalesces it with any neighbor it now touches.
    pub fn insert(&mut self, position: usize) -> bool {
        let mut at = self.runs.len();
        for index in 0..self.runs.len() {
            let run = &mut self.runs[index];
            if run.contains(position) {
                return false;
            }
            if run.first.checked_sub(1) == Some(position) {
                run.first = position;
                self.merge_around(index);
                return true;
            }
            if run.last.checked_add(1) == Some(position) {
                run.last = position;
                self.merge_around(index);
                return true;
            }
            if run.first > position.saturating_add(1) {
                at = index;
                break;
            }
        }
        self.runs.insert(at, Interval::single(position));
        true
    }

    /// Coalesces the run at `index` with neighbors it touches or overlaps.
    fn merge_around(&mut self, mut index: usize) {
        while index + 1 < self.runs.len() && self.runs[index].touches(&self.runs[index + 1]) {
            let next = self.runs.remove(index + 1);
            let run = &mut self.runs[index];
            run.last = run.last.max(next.last);
        }
        while index > 0 && self.runs[index - 1].touches(&self.runs[index]) {
            let run = self.runs.remove(index);
            index -= 1;
            let prev = &mut self.runs[index];
            prev.last = prev.last.max(run.last);
        }
    }

    /// Removes `position` and every position after it.
    ///
    /// Positions before `position` are left untouched; nothing is renumbered.
    pub fn truncate(&mut self, position: usize) {
        let keep = self.runs.partition_point(|run| run.first < position);
        self.runs.truncate(keep);
        if let Some(run) = self.runs.last_mut() {
            // `run.first < position`, so `position >= 1` here.
            if run.last >= position {
                run.last = position - 1;
            }
        }
    }

    /// Removes every position.
    pub fn clear(&mut self) {
        self.runs.clear();
    }

    /// Returns `true` if `position` is in the set.
    #[must_use]
    pub fn contains(&self, position: usize) -> bool {
        let index = self.runs.partition_point(|run| run.last < position);
        self.runs
            .get(index)
            .is_some_and(|run| run.contains(position))
    }

    /// Total number of positions in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.runs
            .iter()
            .fold(0_usize, |total, run| total.saturating_add(run.len()))
    }

    /// Returns `true` if the set holds no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Number of positions in the set strictly before `position`.
    #[must_use]
    pub fn count_before(&self, position: usize) -> usize {
        let mut count = 0_usize;
        for run in &self.runs {
            if run.first >= position {
                break;
            }
            if run.last < position {
                count = count.saturating_add(run.len());
            } else {
                count += position - run.first;
                break;
            }
        }
        count
    }

    /// Number of runs used to store the set.
    ///
    /// This reports compression quality; it does not affect query results.
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// The runs of the set, in increasing order.
    #[must_use]
    pub fn runs(&self) -> &[Interval] {
        &self.runs
    }

    /// The largest position in the set, if any.
    #[must_use]
    pub fn last(&self) -> Option<usize> {
        self.runs.last().map(|run| run.last)
    }

    /// Iterates over every position in the set, in increasing order.
    pub fn iter(&self) -> Positions<'_> {
        Positions {
            runs: &self.runs,
            next: self.runs.first().map(|run| run.first),
        }
    }
}

impl Extend<usize> for RangeSet {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        for position in iter {
            self.insert(position);
        }
    }
}

impl FromIterator<usize> for RangeSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a RangeSet {
    type Item = usize;
    type IntoIter = Positions<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the positions of a [`RangeSet`], created by [`RangeSet::iter`].
#[derive(Clone, Debug)]
pub struct Positions<'a> {
    runs: &'a [Interval],
    next: Option<usize>,
}

impl Iterator for Positions<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let position = self.next?;
        let run = self.runs.first()?;
        if position < run.last {
            self.next = Some(position + 1);
        } else {
            self.runs = &self.runs[1..];
            self.next = self.runs.first().map(|run| run.first);
        }
        Some(position)
    }
}

impl FusedIterator for Positions<'_> {}
