//! Handle lifecycle and shared use of a registry across threads.

use std::num::NonZeroUsize;

use genif::measure::Euclidean;
use genif::testing::cluster_with_outlier;
use genif::{CancelToken, Error, ForestRegistry, GenIFConfig};

type Items = Vec<Vec<f64>>;

fn config(seed: u64) -> GenIFConfig {
    GenIFConfig::builder()
        .tree_count(25)
        .subsample_size(64)
        .seed(seed)
        .n_threads(NonZeroUsize::MIN)
        .build()
        .unwrap()
}

#[test]
fn handles_are_distinct_and_independent() {
    let registry: ForestRegistry<_, Euclidean> = ForestRegistry::new();
    let items: Items = cluster_with_outlier(200, 2, 8.0, 1);

    let first = registry.fit(&items, Euclidean, config(1)).unwrap();
    let second = registry.fit(&items, Euclidean, config(2)).unwrap();
    assert_ne!(first, second);
    assert_eq!(registry.len(), 2);

    registry.release(first).unwrap();
    assert!(!registry.contains(first));
    assert!(registry.contains(second));
    assert_eq!(registry.score(second, &items).unwrap().len(), items.len());
}

#[test]
fn released_handle_is_rejected() {
    let registry = ForestRegistry::new();
    let items: Items = cluster_with_outlier(100, 2, 8.0, 3);
    let handle = registry.fit(&items, Euclidean, config(0)).unwrap();

    let model = registry.release(handle).unwrap();
    assert!(registry.is_empty());

    let err = registry.score(handle, &items).unwrap_err();
    assert!(matches!(err, Error::InvalidHandle(h) if h == handle));
    assert!(matches!(registry.release(handle), Err(Error::InvalidHandle(_))));

    // The released model stays usable by whoever holds it.
    assert_eq!(model.score(&items).unwrap().len(), items.len());
}

#[test]
fn foreign_handle_is_rejected() {
    let ours: ForestRegistry<Vec<f64>, Euclidean> = ForestRegistry::new();
    let theirs: ForestRegistry<Vec<f64>, Euclidean> = ForestRegistry::new();
    let items: Items = cluster_with_outlier(100, 2, 8.0, 5);

    let mine = ours.fit(&items, Euclidean, config(0)).unwrap();
    let foreign = theirs.fit(&items, Euclidean, config(0)).unwrap();

    assert!(!ours.contains(foreign));
    assert!(matches!(ours.score(foreign, &items), Err(Error::InvalidHandle(_))));
    assert!(matches!(ours.release(foreign), Err(Error::InvalidHandle(_))));
    assert!(theirs.contains(foreign));
    assert!(ours.contains(mine));
}

#[test]
fn concurrent_scoring_matches_sequential() {
    let registry = ForestRegistry::new();
    let items: Items = cluster_with_outlier(300, 3, 10.0, 9);
    let handle = registry.fit(&items, Euclidean, config(4)).unwrap();
    let expected = registry.score(handle, &items).unwrap();

    std::thread::scope(|s| {
        let workers: Vec<_> = (0..4)
            .map(|_| s.spawn(|| registry.score(handle, &items).unwrap()))
            .collect();
        for worker in workers {
            assert_eq!(worker.join().unwrap(), expected);
        }
    });
}

#[test]
fn concurrent_fits_get_unique_handles() {
    let registry = ForestRegistry::new();
    let items: Items = cluster_with_outlier(150, 2, 6.0, 2);

    let handles: Vec<_> = std::thread::scope(|s| {
        let workers: Vec<_> = (0..6u64)
            .map(|seed| {
                let registry = &registry;
                let items = &items;
                s.spawn(move || registry.fit(items, Euclidean, config(seed)).unwrap())
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    assert_eq!(registry.len(), 6);
    for (i, a) in handles.iter().enumerate() {
        assert!(handles[i + 1..].iter().all(|b| a != b));
    }
}

#[test]
fn cancelled_fit_registers_nothing() {
    let registry = ForestRegistry::new();
    let items: Items = cluster_with_outlier(100, 2, 8.0, 7);
    let cancel = CancelToken::new();
    cancel.cancel();

    let err = registry
        .fit_cancellable(&items, Euclidean, config(0), &cancel)
        .unwrap_err();
    assert!(err.is_cancelled());
    assert!(registry.is_empty());
}

#[test]
fn cancelled_scoring_leaves_forest_registered() {
    let registry = ForestRegistry::new();
    let items: Items = cluster_with_outlier(100, 2, 8.0, 9);
    let handle = registry.fit(&items, Euclidean, config(0)).unwrap();

    let cancel = CancelToken::new();
    cancel.cancel();
    let err = registry
        .score_cancellable(handle, &items, &cancel)
        .unwrap_err();
    assert!(err.is_cancelled());
    assert!(registry.contains(handle));

    let live = CancelToken::new();
    assert_eq!(
        registry.score_cancellable(handle, &items, &live).unwrap(),
        registry.score(handle, &items).unwrap()
    );

    registry.release(handle).unwrap();
    let err = registry
        .score_cancellable(handle, &items, &live)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidHandle(h) if h == handle));
}
