// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Category values and their offset contribution.

use core::fmt::Debug;

/// A category value shared by many positions, such as a row height.
///
/// Every position assigned to a category contributes [`Category::extent`] to
/// the running offset of all positions after it. Categories are ordered so
/// that iteration across categories is deterministic.
pub trait Category: Copy + Ord + Debug {
    /// The extent of a single position in this category.
    ///
    /// Extents are expected to be non-negative. Values that do not fit in an
    /// `i64` map to `i64::MAX`.
    fn extent(self) -> i64;
}

macro_rules! impl_category_lossless {
    ($($ty:ty),*) => {
        $(
            impl Category for $ty {
                #[inline]
                fn extent(self) -> i64 {
                    i64::from(self)
                }
            }
        )*
    };
}

macro_rules! impl_category_saturating {
    ($($ty:ty),*) => {
        $(
            impl Category for $ty {
                #[inline]
                fn extent(self) -> i64 {
                    i64::try_from(self).unwrap_or(i64::MAX)
                }
            }
        )*
    };
}

impl_category_lossless!(u8, u16, u32, i8, i16, i32);
impl_category_saturating!(u64, u128, usize, i128, isize);

impl Category for i64 {
    #[inline]
    fn extent(self) -> i64 {
        self
    }
}

/// Converts a position count into an offset multiplier, saturating on overflow.
#[inline]
pub(crate) fn count_to_i64(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

/// Returns `extent * count`, saturating on overflow.
#[inline]
pub(crate) fn scaled_extent<C: Category>(category: C, count: usize) -> i64 {
    category.extent().saturating_mul(count_to_i64(count))
}
