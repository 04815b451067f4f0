// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Model-based checks of `RangeSet` and `CategoryCache` against naive storage.

use std::collections::BTreeSet;

use proptest::prelude::*;
use understory_height_cache::{CategoryCache, RangeSet};

#[derive(Clone, Debug)]
enum Op {
    Insert(usize),
    Truncate(usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        8 => (0_usize..64).prop_map(Op::Insert),
        1 => (0_usize..64).prop_map(Op::Truncate),
    ]
}

/// Runs are strictly increasing, non-empty, and never adjacent.
fn assert_canonical(set: &RangeSet) {
    for run in set.runs() {
        assert!(run.first <= run.last, "empty run {run:?}");
    }
    for pair in set.runs().windows(2) {
        assert!(
            pair[0].last + 1 < pair[1].first,
            "runs {:?} and {:?} should have been merged",
            pair[0],
            pair[1]
        );
    }
}

/// Per-position heights, the naive form of a dense cache.
fn arb_heights() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(prop_oneof![Just(20_u32), Just(22), Just(40), Just(0)], 1..200)
}

fn cache_from(heights: &[u32], order: &[usize]) -> CategoryCache<u32> {
    let mut cache = CategoryCache::new();
    for &position in order {
        cache.put(position, heights[position]);
    }
    cache
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn range_set_matches_btree_set(ops in prop::collection::vec(arb_op(), 0..200)) {
        let mut set = RangeSet::new();
        let mut model = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(position) => {
                    let added = set.insert(position);
                    prop_assert_eq!(added, model.insert(position));
                }
                Op::Truncate(position) => {
                    set.truncate(position);
                    model.retain(|&p| p < position);
                }
            }
            assert_canonical(&set);
        }

        prop_assert_eq!(set.len(), model.len());
        prop_assert_eq!(set.iter().collect::<Vec<_>>(), model.iter().copied().collect::<Vec<_>>());
        for position in 0..70 {
            prop_assert_eq!(set.contains(position), model.contains(&position));
            prop_assert_eq!(set.count_before(position), model.range(..position).count());
        }
    }

    #[test]
    fn any_insert_order_of_a_prefix_collapses(order in Just((0_usize..100).collect::<Vec<_>>()).prop_shuffle()) {
        let set: RangeSet = order.into_iter().collect();
        prop_assert_eq!(set.run_count(), 1);
        prop_assert_eq!(set.len(), 100);
    }

    #[test]
    fn cache_offsets_match_prefix_sums(
        (heights, order) in arb_heights().prop_flat_map(|heights| {
            let order = Just((0..heights.len()).collect::<Vec<_>>()).prop_shuffle();
            (Just(heights), order)
        })
    ) {
        let cache = cache_from(&heights, &order);
        prop_assert!(cache.is_dense());
        prop_assert_eq!(cache.len(), heights.len());

        let mut start = 0_i64;
        for (position, &height) in heights.iter().enumerate() {
            prop_assert_eq!(cache.offset_and_category(position), Some((start, height)));
            prop_assert_eq!(cache.category_of(position), Some(height));
            start += i64::from(height);
        }
        prop_assert_eq!(cache.total_extent(), start);
        prop_assert_eq!(cache.offset_of(heights.len()), None);
    }

    #[test]
    fn reverse_lookup_finds_covering_position(heights in arb_heights(), probe in 0_i64..10_000) {
        let order: Vec<usize> = (0..heights.len()).collect();
        let cache = cache_from(&heights, &order);

        // First position whose span `[start, start + height)` contains `probe`.
        let mut start = 0_i64;
        let mut expected = None;
        for (position, &height) in heights.iter().enumerate() {
            let end = start + i64::from(height);
            if probe < end {
                expected = Some(position);
                break;
            }
            start = end;
        }

        prop_assert_eq!(cache.position_at_offset(probe), expected);
        prop_assert_eq!(cache.position_at_offset(-1 - probe), None);
    }

    #[test]
    fn truncation_drops_the_tail(heights in arb_heights(), cut in 0_usize..250) {
        let order: Vec<usize> = (0..heights.len()).collect();
        let mut cache = cache_from(&heights, &order);
        cache.truncate(cut);

        let kept = cut.min(heights.len());
        prop_assert_eq!(cache.len(), kept);
        prop_assert!(cache.is_dense());
        for position in 0..heights.len() {
            prop_assert_eq!(cache.category_of(position).is_some(), position < kept);
        }
        let kept_extent: i64 = heights[..kept].iter().map(|&h| i64::from(h)).sum();
        prop_assert_eq!(cache.total_extent(), kept_extent);
        prop_assert_eq!(cache.position_at_offset(kept_extent), None);
    }
}
