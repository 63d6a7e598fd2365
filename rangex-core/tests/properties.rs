//! Property tests checking the pruned scan against a brute-force oracle

use hashbrown::HashMap;
use proptest::prelude::*;
use rangex_core::{RangeEntry, RangeIndex};

type Entry = RangeEntry<i64, u32>;

fn entry_strategy() -> impl Strategy<Value = Entry> {
    (-1_000i64..1_000, 0i64..200, any::<u32>())
        .prop_map(|(start, span, value)| RangeEntry::new(start, start + span, value))
}

fn entries_strategy() -> impl Strategy<Value = Vec<Entry>> {
    prop::collection::vec(entry_strategy(), 0..200)
}

fn multiset<'a, I>(entries: I) -> HashMap<Entry, usize>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut counts = HashMap::new();
    for entry in entries {
        *counts.entry(*entry).or_insert(0) += 1;
    }
    counts
}

fn sorted_by_start(found: &[&Entry]) -> bool {
    found.windows(2).all(|pair| pair[0].start <= pair[1].start)
}

proptest! {
    #[test]
    fn query_range_matches_oracle(
        entries in entries_strategy(),
        from in -1_300i64..1_300,
        width in 0i64..300,
    ) {
        let to = from + width;
        let index = RangeIndex::build(entries.clone());
        let found = index.query_range(from, to);

        let expected = entries
            .iter()
            .filter(|entry| entry.start <= to && from <= entry.end);
        prop_assert_eq!(multiset(found.iter().copied()), multiset(expected));
        prop_assert!(sorted_by_start(&found));
        prop_assert_eq!(index.count_range(from, to), found.len());
    }

    #[test]
    fn query_point_matches_oracle(
        entries in entries_strategy(),
        point in -1_300i64..1_300,
    ) {
        let index = RangeIndex::build(entries.clone());
        let found = index.query_point(point);

        let expected = entries
            .iter()
            .filter(|entry| entry.start <= point && point <= entry.end);
        prop_assert_eq!(multiset(found.iter().copied()), multiset(expected));
        prop_assert!(sorted_by_start(&found));
    }

    #[test]
    fn inverted_queries_follow_the_literal_rule(
        entries in entries_strategy(),
        to in -1_300i64..1_300,
        gap in 1i64..100,
    ) {
        let from = to + gap;
        let index = RangeIndex::build(entries.clone());

        let expected = entries
            .iter()
            .filter(|entry| entry.start <= to && from <= entry.end);
        prop_assert_eq!(multiset(index.query_range(from, to)), multiset(expected));
    }

    #[test]
    fn permutation_does_not_change_results(
        entries in entries_strategy(),
        seed in any::<u64>(),
        from in -1_300i64..1_300,
        width in 0i64..300,
    ) {
        let mut shuffled = entries.clone();
        // Deterministic Fisher-Yates driven by a simple LCG
        let mut state = seed;
        for i in (1..shuffled.len()).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let j = (state >> 33) as usize % (i + 1);
            shuffled.swap(i, j);
        }

        let original = RangeIndex::build(entries);
        let permuted = RangeIndex::build(shuffled);

        prop_assert_eq!(original.max_span(), permuted.max_span());
        prop_assert_eq!(original.lower_bound(), permuted.lower_bound());
        prop_assert_eq!(
            multiset(original.query_range(from, from + width)),
            multiset(permuted.query_range(from, from + width))
        );
        prop_assert_eq!(
            multiset(original.query_point(from)),
            multiset(permuted.query_point(from))
        );
    }

    #[test]
    fn values_round_trip_the_input(entries in entries_strategy()) {
        let index = RangeIndex::build(entries.clone());

        prop_assert_eq!(index.count(), entries.len());
        prop_assert_eq!(multiset(index.values()), multiset(&entries));

        let expected_span = entries.iter().map(|entry| entry.span()).max().unwrap_or(0);
        prop_assert_eq!(index.max_span(), expected_span);
    }

    #[test]
    fn unsigned_queries_near_zero(
        raw in prop::collection::vec((0u32..500, 0u32..100), 0..100),
        point in 0u32..600,
    ) {
        let entries: Vec<RangeEntry<u32, usize>> = raw
            .iter()
            .enumerate()
            .map(|(i, &(start, span))| RangeEntry::new(start, start + span, i))
            .collect();
        let index = RangeIndex::build(entries.clone());

        let expected = entries.iter().filter(|entry| entry.contains(point)).count();
        prop_assert_eq!(index.count_point(point), expected);
    }

    #[test]
    fn float_queries_match_oracle(
        raw in prop::collection::vec((-100.0f64..100.0, 0.0f64..20.0), 0..100),
        point in -130.0f64..130.0,
    ) {
        let entries: Vec<RangeEntry<f64, usize>> = raw
            .iter()
            .enumerate()
            .map(|(i, &(start, span))| RangeEntry::new(start, start + span, i))
            .collect();
        let index = RangeIndex::build(entries.clone());

        let mut found: Vec<usize> = index.query_point(point).iter().map(|e| e.value).collect();
        let mut expected: Vec<usize> = entries
            .iter()
            .filter(|entry| entry.contains(point))
            .map(|entry| entry.value)
            .collect();
        found.sort_unstable();
        expected.sort_unstable();
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn wide_f32_queries_match_oracle(
        raw in prop::collection::vec(
            (-(1i32 << 25)..(1 << 25), 0u8..4, 0i32..(1 << 25)),
            1..60,
        ),
        pick in any::<prop::sample::Index>(),
        offset in -(1i32 << 25)..(1 << 25),
        width in 0i32..(1 << 20),
    ) {
        let entries: Vec<RangeEntry<f32, usize>> = raw
            .iter()
            .enumerate()
            .map(|(i, &(whole, quarter, span))| {
                let start = whole as f32 + f32::from(quarter) * 0.25;
                RangeEntry::new(start, start + span as f32, i)
            })
            .collect();
        let index = RangeIndex::build(entries.clone());

        // Anchor on an entry end so queries land where rounding matters
        let anchor = pick.get(&entries).end;
        for (from, to) in [
            (anchor, anchor),
            (anchor, anchor + width as f32),
            (offset as f32, offset as f32 + width as f32),
        ] {
            prop_assert_eq!(
                sorted_values(index.query_range(from, to)),
                sorted_values(entries.iter().filter(|e| e.start <= to && from <= e.end))
            );
            prop_assert_eq!(
                sorted_values(index.query_point(from)),
                sorted_values(entries.iter().filter(|e| e.contains(from)))
            );
        }
    }

    #[test]
    fn wide_f64_queries_match_oracle(
        raw in prop::collection::vec(
            (-(1i64 << 54)..(1 << 54), 0u8..4, 0i64..(1 << 54)),
            1..60,
        ),
        pick in any::<prop::sample::Index>(),
        offset in -(1i64 << 54)..(1 << 54),
        width in 0i64..(1 << 40),
    ) {
        let entries: Vec<RangeEntry<f64, usize>> = raw
            .iter()
            .enumerate()
            .map(|(i, &(whole, quarter, span))| {
                let start = whole as f64 + f64::from(quarter) * 0.25;
                RangeEntry::new(start, start + span as f64, i)
            })
            .collect();
        let index = RangeIndex::build(entries.clone());

        let anchor = pick.get(&entries).end;
        for (from, to) in [
            (anchor, anchor),
            (anchor, anchor + width as f64),
            (offset as f64, offset as f64 + width as f64),
        ] {
            prop_assert_eq!(
                sorted_values(index.query_range(from, to)),
                sorted_values(entries.iter().filter(|e| e.start <= to && from <= e.end))
            );
            prop_assert_eq!(
                sorted_values(index.query_point(from)),
                sorted_values(entries.iter().filter(|e| e.contains(from)))
            );
        }
    }

    #[test]
    fn fractional_f64_starts_match_oracle(
        raw in prop::collection::vec((-1.0e6f64..1.0e6, 0.0f64..1.0e5), 1..100),
        pick in any::<prop::sample::Index>(),
        width in 0.0f64..1.0e4,
    ) {
        let entries: Vec<RangeEntry<f64, usize>> = raw
            .iter()
            .enumerate()
            .map(|(i, &(start, span))| RangeEntry::new(start, start + span, i))
            .collect();
        let index = RangeIndex::build(entries.clone());

        let anchor = pick.get(&entries).end;
        let to = anchor + width;
        prop_assert_eq!(
            sorted_values(index.query_range(anchor, to)),
            sorted_values(entries.iter().filter(|e| e.start <= to && anchor <= e.end))
        );
        prop_assert_eq!(
            sorted_values(index.query_point(anchor)),
            sorted_values(entries.iter().filter(|e| e.contains(anchor)))
        );
    }
}

fn sorted_values<'a, T: 'a>(
    found: impl IntoIterator<Item = &'a RangeEntry<T, usize>>,
) -> Vec<usize> {
    let mut values: Vec<usize> = found.into_iter().map(|entry| entry.value).collect();
    values.sort_unstable();
    values
}

#[test]
fn upper_bound_uses_last_start_not_max_end() {
    let index = RangeIndex::build(vec![
        RangeEntry::new(0i64, 500, 0u32),
        RangeEntry::new(100, 120, 1),
    ]);
    assert_eq!(index.upper_bound(), 120);
}
