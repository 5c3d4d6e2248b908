//! Distances for fixed-length numeric vectors.

use std::convert::Infallible;

use ndarray::Array1;

use super::Dissimilarity;
use crate::error::MeasureError;

/// Read access to the components of a numeric vector item.
///
/// Implemented for `Vec<f64>`, `Box<[f64]>`, `[f64; N]` and
/// `ndarray::Array1<f64>`, so any of them can be a forest item under the
/// numeric measures and kernels.
pub trait FeatureVector: Send + Sync {
    /// Number of components.
    fn n_features(&self) -> usize;

    /// Components in order.
    fn features(&self) -> impl Iterator<Item = f64> + '_;

    /// Pairwise components of `self` and `other`, after checking their lengths.
    fn paired<'a>(
        &'a self,
        other: &'a Self,
    ) -> Result<impl Iterator<Item = (f64, f64)> + 'a, MeasureError> {
        let (left, right) = (self.n_features(), other.n_features());
        if left != right {
            return Err(MeasureError::DimensionMismatch { left, right });
        }
        Ok(self.features().zip(other.features()))
    }
}

impl FeatureVector for Vec<f64> {
    #[inline]
    fn n_features(&self) -> usize {
        self.len()
    }

    #[inline]
    fn features(&self) -> impl Iterator<Item = f64> + '_ {
        self.iter().copied()
    }
}

impl FeatureVector for Box<[f64]> {
    #[inline]
    fn n_features(&self) -> usize {
        self.len()
    }

    #[inline]
    fn features(&self) -> impl Iterator<Item = f64> + '_ {
        self.iter().copied()
    }
}

impl<const N: usize> FeatureVector for [f64; N] {
    #[inline]
    fn n_features(&self) -> usize {
        N
    }

    #[inline]
    fn features(&self) -> impl Iterator<Item = f64> + '_ {
        self.iter().copied()
    }
}

impl FeatureVector for Array1<f64> {
    #[inline]
    fn n_features(&self) -> usize {
        self.len()
    }

    #[inline]
    fn features(&self) -> impl Iterator<Item = f64> + '_ {
        self.iter().copied()
    }
}

/// Squared L2 distance `Σ (aᵢ − bᵢ)²`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SquaredEuclidean;

/// L2 distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

/// L1 distance `Σ |aᵢ − bᵢ|`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Manhattan;

pub(crate) fn squared_l2<V: FeatureVector>(a: &V, b: &V) -> Result<f64, MeasureError> {
    Ok(a.paired(b)?.map(|(x, y)| (x - y) * (x - y)).sum())
}

impl<V: FeatureVector> Dissimilarity<V> for SquaredEuclidean {
    type Error = MeasureError;

    #[inline]
    fn dissimilarity(&self, a: &V, b: &V) -> Result<f64, MeasureError> {
        squared_l2(a, b)
    }
}

impl<V: FeatureVector> Dissimilarity<V> for Euclidean {
    type Error = MeasureError;

    #[inline]
    fn dissimilarity(&self, a: &V, b: &V) -> Result<f64, MeasureError> {
        squared_l2(a, b).map(f64::sqrt)
    }
}

impl<V: FeatureVector> Dissimilarity<V> for Manhattan {
    type Error = MeasureError;

    #[inline]
    fn dissimilarity(&self, a: &V, b: &V) -> Result<f64, MeasureError> {
        Ok(a.paired(b)?.map(|(x, y)| (x - y).abs()).sum())
    }
}

/// Plain numbers are one-dimensional vectors.
impl Dissimilarity<f64> for Euclidean {
    type Error = Infallible;

    #[inline]
    fn dissimilarity(&self, a: &f64, b: &f64) -> Result<f64, Infallible> {
        Ok((a - b).abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_euclidean_345() {
        let d = Euclidean.dissimilarity(&vec![0.0, 0.0], &vec![3.0, 4.0]).unwrap();
        assert_abs_diff_eq!(d, 5.0, epsilon = 1e-12);
        let d2 = SquaredEuclidean.dissimilarity(&[0.0f64, 0.0], &[3.0f64, 4.0]).unwrap();
        assert_abs_diff_eq!(d2, 25.0, epsilon = 1e-12);
    }

    #[test]
    fn test_manhattan() {
        let d = Manhattan
            .dissimilarity(&array![1.0f64, -2.0, 3.0], &array![0.0f64, 0.0, 0.0])
            .unwrap();
        assert_abs_diff_eq!(d, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_scalar_euclidean() {
        assert_eq!(Euclidean.dissimilarity(&-1.5f64, &2.0f64).unwrap(), 3.5);
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = Euclidean
            .dissimilarity(&vec![1.0, 2.0], &vec![1.0, 2.0, 3.0])
            .unwrap_err();
        assert_eq!(err, MeasureError::DimensionMismatch { left: 2, right: 3 });
    }

    #[test]
    fn test_boxed_slice_matches_vec() {
        let a: Box<[f64]> = vec![1.0, 2.0].into_boxed_slice();
        let b: Box<[f64]> = vec![4.0, 6.0].into_boxed_slice();
        let boxed = Euclidean.dissimilarity(&a, &b).unwrap();
        let plain = Euclidean.dissimilarity(&a.to_vec(), &b.to_vec()).unwrap();
        assert_eq!(boxed, plain);
    }
}
