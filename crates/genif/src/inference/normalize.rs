//! Expected path length of an unsuccessful BST search and the score mapping.

/// Euler-Mascheroni constant, to the precision used for `H(i)`.
pub const EULER_GAMMA: f64 = 0.5772156649;

/// Harmonic number approximation `H(i) ≈ ln(i) + γ`.
#[inline]
pub fn harmonic(i: f64) -> f64 {
    i.ln() + EULER_GAMMA
}

/// Average path length `c(s) = 2·H(s − 1) − 2(s − 1)/s` of an unsuccessful
/// search in a binary search tree of `s` items; 0 for `s <= 1`.
///
/// Added to the depth of a leaf holding `s` items and used as the score
/// normaliser for subsample size `m`.
#[inline]
pub fn average_path_length(s: u32) -> f64 {
    if s <= 1 {
        return 0.0;
    }
    let s = f64::from(s);
    2.0 * harmonic(s - 1.0) - 2.0 * (s - 1.0) / s
}

/// Map a mean adjusted path length to `2^(−h_avg / c(m))`.
///
/// Short paths give scores near 1, paths of typical length give about 0.5.
/// When `c(m) = 0` (a subsample of one item) every score is 1.0.
#[inline]
pub fn anomaly_score(mean_path_length: f64, subsample_size: u32) -> f64 {
    let c = average_path_length(subsample_size);
    if c == 0.0 {
        return 1.0;
    }
    (-mean_path_length / c).exp2()
}
