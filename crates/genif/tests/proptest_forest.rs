//! Property-based tests over arbitrary numeric datasets.
//!
//! Datasets include duplicates and constant columns, which exercise the
//! homogeneous-leaf paths of the builder.

use proptest::collection::vec as prop_vec;
use proptest::prelude::*;

use genif::measure::{Euclidean, Manhattan};
use genif::repr::IsolationTree;
use genif::{GenIFConfig, GenIFModel};

// =============================================================================
// Arbitrary dataset generators
// =============================================================================

/// Coordinates from a small grid so exact duplicates are common.
fn arb_coord() -> impl Strategy<Value = f64> {
    prop_oneof![
        (-4i32..=4).prop_map(f64::from),
        (-1e3f64..1e3).prop_filter("must be finite", |x| x.is_finite()),
    ]
}

fn arb_dataset() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (1usize..=4).prop_flat_map(|dims| prop_vec(prop_vec(arb_coord(), dims), 1..120))
}

fn arb_config() -> impl Strategy<Value = GenIFConfig> {
    (1u32..=8, 2u32..=64, any::<u64>()).prop_map(|(trees, m, seed)| {
        GenIFConfig::builder()
            .tree_count(trees)
            .subsample_size(m)
            .seed(seed)
            .build()
            .unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every fit tree is structurally valid and sized by the subsample.
    #[test]
    fn trees_are_well_formed(items in arb_dataset(), config in arb_config()) {
        let model = GenIFModel::fit(&items, Euclidean, config.clone()).unwrap();
        let m = model.subsample_size();
        prop_assert_eq!(m as usize, items.len().min(config.subsample_size as usize));
        prop_assert_eq!(model.n_trees(), config.tree_count as usize);
        prop_assert_eq!(model.forest().validate(), Ok(()));

        for tree in model.forest().trees() {
            let total: u64 = tree.leaves().map(|(_, leaf)| u64::from(leaf.size())).sum();
            prop_assert_eq!(total, u64::from(m));
            prop_assert!(tree.n_nodes() <= 2 * m.max(1) as usize - 1);
            prop_assert_eq!(tree.max_depth(), IsolationTree::<Vec<f64>>::stopping_depth(m));
            prop_assert!(tree.nodes().iter().all(|n| n.depth() <= tree.max_depth()));
        }
    }

    /// Scores are in (0, 1] for training items and for unseen items.
    #[test]
    fn scores_in_unit_interval(
        items in arb_dataset(),
        config in arb_config(),
        probe in prop_vec(arb_coord(), 4),
    ) {
        let model = GenIFModel::fit(&items, Manhattan, config).unwrap();
        let mut queries = items.clone();
        queries.push(probe[..items[0].len()].to_vec());

        for s in model.score(&queries).unwrap() {
            prop_assert!(s > 0.0 && s <= 1.0, "score {} outside (0, 1]", s);
        }
    }

    /// Scoring one item at a time agrees with the batch.
    #[test]
    fn score_one_matches_batch(items in arb_dataset(), config in arb_config()) {
        let model = GenIFModel::fit(&items, Euclidean, config).unwrap();
        let batch = model.score(&items).unwrap();
        for (item, expected) in items.iter().zip(&batch) {
            prop_assert_eq!(model.score_one(item).unwrap(), *expected);
        }
    }

    /// Identical items always land in the same leaf of every tree.
    #[test]
    fn duplicates_share_leaves(items in arb_dataset(), config in arb_config()) {
        let model = GenIFModel::fit(&items, Euclidean, config).unwrap();
        for (i, a) in items.iter().enumerate() {
            for b in items[i + 1..].iter().filter(|b| *b == a) {
                for tree in model.forest().trees() {
                    prop_assert_eq!(
                        tree.traverse(&Euclidean, a).unwrap(),
                        tree.traverse(&Euclidean, b).unwrap()
                    );
                }
            }
        }
    }
}
