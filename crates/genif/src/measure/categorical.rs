//! Distances for categorical tuples.

use std::convert::Infallible;

use super::Dissimilarity;
use crate::error::MeasureError;

/// Number of positions at which two tuples hold different categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hamming;

impl<C: PartialEq + Send + Sync> Dissimilarity<Vec<C>> for Hamming {
    type Error = MeasureError;

    fn dissimilarity(&self, a: &Vec<C>, b: &Vec<C>) -> Result<f64, MeasureError> {
        if a.len() != b.len() {
            return Err(MeasureError::DimensionMismatch {
                left: a.len(),
                right: b.len(),
            });
        }
        Ok(mismatches(a, b))
    }
}

impl<C: PartialEq + Send + Sync, const N: usize> Dissimilarity<[C; N]> for Hamming {
    type Error = Infallible;

    #[inline]
    fn dissimilarity(&self, a: &[C; N], b: &[C; N]) -> Result<f64, Infallible> {
        Ok(mismatches(a, b))
    }
}

#[inline]
fn mismatches<C: PartialEq>(a: &[C], b: &[C]) -> f64 {
    a.iter().zip(b).filter(|(x, y)| x != y).count() as f64
}
