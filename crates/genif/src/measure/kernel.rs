//! Kernel-induced distances.
//!
//! A positive-definite kernel `k` induces the squared feature-space distance
//! `d(x, y) = k(x, x) + k(y, y) − 2·k(x, y)`, which is what [`KernelDistance`]
//! hands to the forest. [`Rbf`] and [`Matern`] cover the usual stationary
//! kernels.

use std::fmt;
use std::str::FromStr;

use super::numeric::{FeatureVector, squared_l2};
use super::Dissimilarity;
use crate::error::MeasureError;

/// A similarity function over numeric vectors.
pub trait Kernel: Send + Sync {
    fn evaluate<V: FeatureVector>(&self, a: &V, b: &V) -> Result<f64, MeasureError>;
}

// =============================================================================
// RBF
// =============================================================================

/// Gaussian kernel `l² · exp(−‖x − y‖² / (2σ²))`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rbf {
    /// Length scale σ.
    pub sigma: f64,
    /// Output scale `l`.
    pub l: f64,
}

impl Rbf {
    pub fn new(sigma: f64) -> Self {
        Self { sigma, l: 1.0 }
    }

    pub fn with_output_scale(mut self, l: f64) -> Self {
        self.l = l;
        self
    }
}

impl Default for Rbf {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Kernel for Rbf {
    #[inline]
    fn evaluate<V: FeatureVector>(&self, a: &V, b: &V) -> Result<f64, MeasureError> {
        let denom = 2.0 * self.sigma * self.sigma;
        Ok(self.l * self.l * (-squared_l2(a, b)? / denom).exp())
    }
}

// =============================================================================
// Matérn
// =============================================================================

/// Smoothness ν of a [`Matern`] kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaternOrder {
    /// ν = 1/2 (exponential kernel).
    Half,
    /// ν = 3/2.
    ThreeHalves,
    /// ν = 5/2.
    FiveHalves,
}

impl MaternOrder {
    /// Twice the smoothness, i.e. 1, 3 or 5.
    pub fn degree(self) -> u32 {
        match self {
            MaternOrder::Half => 1,
            MaternOrder::ThreeHalves => 3,
            MaternOrder::FiveHalves => 5,
        }
    }
}

/// Matérn kernel on per-dimension scaled inputs.
///
/// With `r = ‖x/Σ − y/Σ‖` and `K = r·√(2ν)`:
///
/// | order | value |
/// |---|---|
/// | ν = 1/2 | `l² e^{−K}` |
/// | ν = 3/2 | `l² (1 + K) e^{−K}` |
/// | ν = 5/2 | `l² (1 + K + K²/3) e^{−K}` |
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matern {
    /// Per-dimension length scales Σ. Must match the item dimension.
    pub scaling: Vec<f64>,
    pub order: MaternOrder,
    /// Output scale `l`.
    pub l: f64,
}

impl Matern {
    pub fn new(scaling: Vec<f64>, order: MaternOrder) -> Self {
        Self {
            scaling,
            order,
            l: 1.0,
        }
    }

    pub fn with_output_scale(mut self, l: f64) -> Self {
        self.l = l;
        self
    }
}

impl Kernel for Matern {
    fn evaluate<V: FeatureVector>(&self, a: &V, b: &V) -> Result<f64, MeasureError> {
        let expected = self.scaling.len();
        if a.n_features() != expected {
            return Err(MeasureError::ScalingMismatch {
                expected,
                got: a.n_features(),
            });
        }
        let r2: f64 = a
            .paired(b)?
            .zip(&self.scaling)
            .map(|((x, y), s)| {
                let diff = x / s - y / s;
                diff * diff
            })
            .sum();
        let k = r2.sqrt() * f64::from(self.order.degree()).sqrt();
        let shape = match self.order {
            MaternOrder::Half => 1.0,
            MaternOrder::ThreeHalves => 1.0 + k,
            MaternOrder::FiveHalves => 1.0 + k + k * k / 3.0,
        };
        Ok(self.l * self.l * shape * (-k).exp())
    }
}

// =============================================================================
// Kernel distance
// =============================================================================

/// Squared feature-space distance induced by a kernel.
///
/// Rounding can push `k(x,x) + k(y,y) − 2k(x,y)` a hair below zero for
/// near-identical inputs; the result is clamped at 0.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelDistance<K> {
    kernel: K,
}

impl<K: Kernel> KernelDistance<K> {
    pub fn new(kernel: K) -> Self {
        Self { kernel }
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }
}

impl<V: FeatureVector, K: Kernel> Dissimilarity<V> for KernelDistance<K> {
    type Error = MeasureError;

    fn dissimilarity(&self, a: &V, b: &V) -> Result<f64, MeasureError> {
        let kab = self.kernel.evaluate(a, b)?;
        let kaa = self.kernel.evaluate(a, a)?;
        let kbb = self.kernel.evaluate(b, b)?;
        Ok((kaa + kbb - 2.0 * kab).max(0.0))
    }
}

// =============================================================================
// Kernel identifiers
// =============================================================================

/// Textual kernel identifier: `rbf`, `matern-d1`, `matern-d3` or `matern-d5`.
///
/// ```
/// use genif::measure::{KernelKind, MaternOrder};
///
/// let kind: KernelKind = "matern-d3".parse().unwrap();
/// assert_eq!(kind, KernelKind::Matern(MaternOrder::ThreeHalves));
/// assert_eq!(kind.to_string(), "matern-d3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelKind {
    Rbf,
    Matern(MaternOrder),
}

impl KernelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            KernelKind::Rbf => "rbf",
            KernelKind::Matern(MaternOrder::Half) => "matern-d1",
            KernelKind::Matern(MaternOrder::ThreeHalves) => "matern-d3",
            KernelKind::Matern(MaternOrder::FiveHalves) => "matern-d5",
        }
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized kernel identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown kernel '{0}', expected one of: rbf, matern-d1, matern-d3, matern-d5")]
pub struct UnknownKernel(pub String);

impl FromStr for KernelKind {
    type Err = UnknownKernel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rbf" => Ok(KernelKind::Rbf),
            "matern-d1" => Ok(KernelKind::Matern(MaternOrder::Half)),
            "matern-d3" => Ok(KernelKind::Matern(MaternOrder::ThreeHalves)),
            "matern-d5" => Ok(KernelKind::Matern(MaternOrder::FiveHalves)),
            _ => Err(UnknownKernel(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[test]
    fn test_rbf_values() {
        let k = Rbf::new(1.0).with_output_scale(2.0);
        let same = k.evaluate(&[1.0f64, 2.0], &[1.0f64, 2.0]).unwrap();
        assert_abs_diff_eq!(same, 4.0, epsilon = 1e-12);
        // ‖x − y‖² = 2, exp(−2 / 2) = e^{−1}
        let apart = k.evaluate(&[0.0f64, 0.0], &[1.0f64, 1.0]).unwrap();
        assert_abs_diff_eq!(apart, 4.0 * (-1.0f64).exp(), epsilon = 1e-12);
    }

    #[rstest]
    #[case(MaternOrder::Half)]
    #[case(MaternOrder::ThreeHalves)]
    #[case(MaternOrder::FiveHalves)]
    fn test_matern_orders(#[case] order: MaternOrder) {
        // Scaled difference is (1, 0), so r = 1 and K = √degree.
        let k = Matern::new(vec![2.0, 1.0], order).with_output_scale(3.0);
        let value = k.evaluate(&[2.0f64, 5.0], &[0.0f64, 5.0]).unwrap();
        let kk = f64::from(order.degree()).sqrt();
        let shape = match order {
            MaternOrder::Half => 1.0,
            MaternOrder::ThreeHalves => 1.0 + kk,
            MaternOrder::FiveHalves => 1.0 + kk + kk * kk / 3.0,
        };
        assert_abs_diff_eq!(value, 9.0 * shape * (-kk).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_matern_half_is_exponential() {
        let k = Matern::new(vec![1.0], MaternOrder::Half);
        let value = k.evaluate(&[0.0f64], &[2.0f64]).unwrap();
        assert_abs_diff_eq!(value, (-2.0f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_matern_scaling_mismatch() {
        let k = Matern::new(vec![1.0, 1.0, 1.0], MaternOrder::Half);
        let err = k.evaluate(&vec![0.0, 0.0], &vec![1.0, 1.0]).unwrap_err();
        assert_eq!(err, MeasureError::ScalingMismatch { expected: 3, got: 2 });
    }

    #[test]
    fn test_kernel_distance() {
        let d = KernelDistance::new(Rbf::new(1.0));
        let x = [0.0f64, 0.0];
        let y = [3.0f64, 4.0];
        assert_eq!(d.dissimilarity(&x, &x).unwrap(), 0.0);
        let expected = 2.0 - 2.0 * (-12.5f64).exp();
        assert_abs_diff_eq!(d.dissimilarity(&x, &y).unwrap(), expected, epsilon = 1e-12);
    }

    #[rstest]
    #[case("rbf", KernelKind::Rbf)]
    #[case("RBF", KernelKind::Rbf)]
    #[case("matern-d1", KernelKind::Matern(MaternOrder::Half))]
    #[case("matern-d5", KernelKind::Matern(MaternOrder::FiveHalves))]
    fn test_kernel_kind_parse(#[case] text: &str, #[case] expected: KernelKind) {
        assert_eq!(text.parse::<KernelKind>().unwrap(), expected);
    }

    #[test]
    fn test_kernel_kind_unknown() {
        let err = "matern-d2".parse::<KernelKind>().unwrap_err();
        assert_eq!(err, UnknownKernel("matern-d2".into()));
    }
}
