//! Synthetic datasets for tests, benches and doc examples.
//!
//! Every generator is deterministic in its `seed`.

use rand::prelude::*;
use rand_distr::StandardNormal;

/// `n` points drawn from a standard normal in `dims` dimensions.
pub fn gaussian_cluster(n: usize, dims: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| (0..dims).map(|_| rng.sample(StandardNormal)).collect())
        .collect()
}

/// A standard normal cluster of `n` points followed by one point at
/// `(offset, …, offset)`. The outlier is the last item, index `n`.
pub fn cluster_with_outlier(n: usize, dims: usize, offset: f64, seed: u64) -> Vec<Vec<f64>> {
    let mut items = gaussian_cluster(n, dims, seed);
    items.push(vec![offset; dims]);
    items
}

/// `n` categorical rows of `n_fields` values, each uniform over
/// `0..n_categories`.
pub fn categorical_rows(n: usize, n_fields: usize, n_categories: u8, seed: u64) -> Vec<Vec<u8>> {
    assert!(n_categories > 0);
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| (0..n_fields).map(|_| rng.gen_range(0..n_categories)).collect())
        .collect()
}

/// `n` copies of `base`, each with up to `max_edits` random ASCII lowercase
/// substitutions.
pub fn mutated_strings(base: &str, n: usize, max_edits: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    let chars: Vec<char> = base.chars().collect();
    (0..n)
        .map(|_| {
            let mut s = chars.clone();
            if !s.is_empty() {
                for _ in 0..rng.gen_range(0..=max_edits) {
                    let pos = rng.gen_range(0..s.len());
                    s[pos] = rng.gen_range(b'a'..=b'j') as char;
                }
            }
            s.into_iter().collect()
        })
        .collect()
}

/// Median of `values` (mean of the two middle values for even lengths).
///
/// # Panics
///
/// Panics if `values` is empty.
pub fn median(values: &[f64]) -> f64 {
    assert!(!values.is_empty(), "median of an empty slice");
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generators_are_deterministic() {
        assert_eq!(gaussian_cluster(10, 3, 1), gaussian_cluster(10, 3, 1));
        assert_ne!(gaussian_cluster(10, 3, 1), gaussian_cluster(10, 3, 2));
        assert_eq!(categorical_rows(5, 4, 3, 9), categorical_rows(5, 4, 3, 9));
    }

    #[test]
    fn test_cluster_with_outlier_shape() {
        let items = cluster_with_outlier(20, 2, 25.0, 0);
        assert_eq!(items.len(), 21);
        assert_eq!(items[20], vec![25.0, 25.0]);
        assert!(items.iter().all(|x| x.len() == 2));
    }

    #[test]
    fn test_categorical_range() {
        let rows = categorical_rows(50, 6, 3, 4);
        assert!(rows.iter().flatten().all(|&c| c < 3));
    }

    #[test]
    fn test_mutated_strings_keep_length() {
        let strings = mutated_strings("sensor-temperature", 30, 3, 2);
        assert!(strings.iter().all(|s| s.chars().count() == 18));
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), 2.5);
    }
}
