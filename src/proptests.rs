use super::*;

use proptest::prelude::*;
use std::collections::BTreeSet;
use std::ops::Bound;

fn key_set_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    // A narrow alphabet gives deep shared prefixes and prefix keys.
    prop::collection::btree_set(prop::collection::vec(b'a'..=b'e', 0..=10), 1..=300)
        .prop_map(|set| set.into_iter().collect())
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        any::<SuffixType>(),
        prop_oneof![Just(0u32), Just(4), Just(16), Just(64)],
        1u32..=64,
        1u32..=12,
        prop_oneof![Just(1usize), Just(3), Just(64)],
    )
        .prop_map(|(suffix_type, ratio, hash_len, real_len, interval)| Config {
            include_dense: ratio > 0,
            sparse_dense_ratio: ratio,
            suffix_type,
            hash_suffix_len: hash_len,
            real_suffix_len: real_len,
            select_sample_interval: interval,
        })
}

/// Real suffixes long enough to hold every remainder.
fn exact_config(ratio: u32) -> Config {
    Config {
        include_dense: ratio > 0,
        sparse_dense_ratio: ratio,
        real_suffix_len: 16,
        ..Config::default()
    }
}

fn is_prefix_of(prefix: &[u8], key: &[u8]) -> bool {
    key.starts_with(prefix)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_rank_select_inverse(
        bits in prop::collection::vec(any::<bool>(), 0..=2000),
        interval in 1usize..=100,
    ) {
        let bv = BitVector::from_bits(bits.iter().copied());
        let rank = RankBitVector::new(bv.clone());
        let select = SelectBitVector::new(bv, interval);

        let ones = bits.iter().filter(|&&b| b).count();
        prop_assert_eq!(rank.count_ones(), ones);
        prop_assert_eq!(select.count_ones(), ones);
        prop_assert_eq!(rank.rank1(bits.len()), ones);

        let mut expected = 0;
        for (i, &bit) in bits.iter().enumerate() {
            prop_assert_eq!(rank.rank1(i), expected);
            prop_assert_eq!(rank.read_bit(i), bit);
            prop_assert_eq!(select.read_bit(i), bit);
            if bit {
                expected += 1;
            }
        }
        for k in 1..=ones {
            let pos = select.select1(k);
            prop_assert!(select.read_bit(pos));
            prop_assert_eq!(rank.rank1(pos + 1), k);
        }
        prop_assert!(select.try_select1(0).is_err());
        prop_assert!(select.try_select1(ones + 1).is_err());
    }

    #[test]
    fn prop_level_bits_survive_concatenation(keys in key_set_strategy()) {
        let mut builder = SurfBuilder::new(Config::default().sparse_only()).unwrap();
        builder.build(&keys).unwrap();

        let lens: Vec<usize> = builder.labels().iter().map(Vec::len).collect();
        let louds = SelectBitVector::from_levels(8, builder.louds_bits(), &lens);
        let has_child = RankBitVector::from_levels(builder.child_indicator_bits(), &lens);

        let mut offset = 0;
        for (level, &n) in lens.iter().enumerate() {
            for i in 0..n {
                prop_assert_eq!(
                    louds.read_bit(offset + i),
                    SurfBuilder::read_bit(&builder.louds_bits()[level], i)
                );
                prop_assert_eq!(
                    has_child.read_bit(offset + i),
                    SurfBuilder::read_bit(&builder.child_indicator_bits()[level], i)
                );
            }
            offset += n;
        }
        // One LOUDS bit per node with edges; the edgeless root of [""] has none.
        let nodes: usize = builder.node_counts().iter().sum();
        prop_assert!(louds.count_ones() == nodes || keys == vec![Vec::<u8>::new()]);
    }

    #[test]
    fn prop_no_false_negatives(keys in key_set_strategy(), config in config_strategy()) {
        let surf = Surf::with_config(&keys, config).unwrap();
        prop_assert_eq!(surf.len(), keys.len());
        for key in &keys {
            prop_assert!(surf.lookup_key(key), "{:?}", key);
        }
    }

    #[test]
    fn prop_perturbed_keys_rejected(
        keys in key_set_strategy(),
        ratio in prop_oneof![Just(0u32), Just(64)],
        pick in any::<prop::sample::Index>(),
        at in any::<prop::sample::Index>(),
    ) {
        let surf = Surf::with_config(&keys, exact_config(ratio)).unwrap();
        let key = pick.get(&keys);
        prop_assume!(!key.is_empty());
        let mut query = key.clone();
        // Outside the key alphabet, so the query is never a stored key.
        query[at.index(key.len())] = b'A';
        prop_assert!(!surf.lookup_key(&query));
    }

    #[test]
    fn prop_successor(keys in key_set_strategy(), config in config_strategy()) {
        let surf = Surf::with_config(&keys, config).unwrap();
        for (i, key) in keys.iter().enumerate() {
            let it = surf.move_to_key_greater_than(key, true);
            prop_assert!(it.is_valid());
            prop_assert!(is_prefix_of(&it.key(), key));

            let it = surf.move_to_key_greater_than(key, false);
            match keys.get(i + 1) {
                Some(next) => {
                    prop_assert!(it.is_valid());
                    prop_assert!(is_prefix_of(&it.key(), next));
                }
                None => prop_assert!(!it.is_valid()),
            }
        }
    }

    #[test]
    fn prop_seek_matches_model(
        keys in key_set_strategy(),
        queries in prop::collection::vec(prop::collection::vec(b'a'..=b'f', 0..=11), 1..=50),
        ratio in prop_oneof![Just(0u32), Just(16), Just(64)],
    ) {
        let surf = Surf::with_config(&keys, exact_config(ratio)).unwrap();
        let model: BTreeSet<Vec<u8>> = keys.iter().cloned().collect();
        for query in &queries {
            let expected = model.range(query.clone()..).next();
            let it = surf.move_to_key_greater_than(query, true);
            let got = it.is_valid().then(|| it.key());
            prop_assert_eq!(got.as_ref(), expected);

            let expected = model
                .range((Bound::Excluded(query.clone()), Bound::Unbounded))
                .next();
            let it = surf.move_to_key_greater_than(query, false);
            let got = it.is_valid().then(|| it.key());
            prop_assert_eq!(got.as_ref(), expected);

            prop_assert_eq!(surf.lookup_key(query), model.contains(query));
        }
    }

    #[test]
    fn prop_iteration_is_monotonic(keys in key_set_strategy(), config in config_strategy()) {
        let surf = Surf::with_config(&keys, config).unwrap();

        let mut it = surf.move_to_key_greater_than(&keys[0], true);
        for key in &keys {
            prop_assert!(it.is_valid());
            prop_assert!(is_prefix_of(&it.key(), key));
            it.increment();
        }
        prop_assert!(!it.is_valid());

        let mut it = surf.move_to_last();
        for key in keys.iter().rev() {
            prop_assert!(it.is_valid());
            prop_assert!(is_prefix_of(&it.key(), key));
            it.decrement();
        }
        prop_assert!(!it.is_valid());
    }

    #[test]
    fn prop_lookup_range_never_misses(
        keys in key_set_strategy(),
        config in config_strategy(),
        a in prop::collection::vec(b'a'..=b'f', 0..=6),
        b in prop::collection::vec(b'a'..=b'f', 0..=6),
    ) {
        let (left, right) = if a <= b { (a, b) } else { (b, a) };
        let surf = Surf::with_config(&keys, config).unwrap();
        let model: BTreeSet<Vec<u8>> = keys.iter().cloned().collect();

        let closed = model.range(left.clone()..=right.clone()).next().is_some();
        if closed {
            prop_assert!(surf.lookup_range(&left, true, &right, true));
        }
        let open = left < right
            && model
                .range((Bound::Excluded(left.clone()), Bound::Excluded(right.clone())))
                .next()
                .is_some();
        if open {
            prop_assert!(surf.lookup_range(&left, false, &right, false));
        }
    }
}

#[test]
fn exhaustive_small_sets_match_model() {
    // Every subset of a small universe that includes prefix keys.
    let universe: Vec<&[u8]> = vec![b"", b"a", b"aa", b"ab", b"b", b"ba", b"bb"];
    let queries: Vec<&[u8]> = vec![b"", b"a", b"aa", b"aab", b"ab", b"ac", b"b", b"ba", b"bab", b"bb", b"c"];

    for mask in 1u32..(1 << universe.len()) {
        let keys: Vec<&[u8]> = universe
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, k)| *k)
            .collect();
        let model: BTreeSet<&[u8]> = keys.iter().copied().collect();

        for ratio in [0u32, 256] {
            let surf = Surf::with_config(&keys, exact_config(ratio)).unwrap();
            assert_eq!(surf.keys().collect::<Vec<_>>(), keys.iter().map(|k| k.to_vec()).collect::<Vec<_>>());

            for query in &queries {
                assert_eq!(surf.lookup_key(query), model.contains(query), "{keys:?} {query:?}");
                let expected = model.range::<&[u8], _>((Bound::Excluded(*query), Bound::Unbounded)).next();
                let it = surf.move_to_key_greater_than(query, false);
                assert_eq!(it.is_valid().then(|| it.key()), expected.map(|k| k.to_vec()), "{keys:?} {query:?}");
            }
        }
    }
}
