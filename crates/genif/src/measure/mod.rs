//! Dissimilarity measures: the only way the engine looks at items.
//!
//! A forest never inspects an item's structure. Everything it needs comes
//! from a [`Dissimilarity`] implementation for the item type, which makes the
//! same tree code work for numeric vectors, categorical tuples, strings,
//! graphs or mixed records.
//!
//! # Built-in measures
//!
//! - [`Euclidean`], [`SquaredEuclidean`], [`Manhattan`]: numeric vectors
//! - [`Hamming`]: categorical tuples
//! - [`Levenshtein`]: strings
//! - [`KernelDistance`] over [`Rbf`] or [`Matern`]: kernel-induced distance
//! - [`from_fn`] / [`from_fallible_fn`]: closures for everything else

mod categorical;
mod kernel;
mod numeric;
mod text;

use std::convert::Infallible;
use std::marker::PhantomData;

use rand::Rng;

pub use categorical::Hamming;
pub use kernel::{Kernel, KernelDistance, KernelKind, Matern, MaternOrder, Rbf, UnknownKernel};
pub use numeric::{Euclidean, FeatureVector, Manhattan, SquaredEuclidean};
pub use text::Levenshtein;

// =============================================================================
// Dissimilarity trait
// =============================================================================

/// A non-negative dissimilarity between two items of type `T`.
///
/// Symmetry is not required, but the measure must be deterministic and
/// defined for every pair of valid items. A measure that can fail reports it
/// through [`Dissimilarity::Error`]; the engine hands that error back to the
/// caller of fit or score untouched.
///
/// # Example
///
/// ```
/// use std::convert::Infallible;
/// use genif::measure::Dissimilarity;
///
/// /// Absolute difference of string lengths.
/// struct LengthGap;
///
/// impl Dissimilarity<String> for LengthGap {
///     type Error = Infallible;
///
///     fn dissimilarity(&self, a: &String, b: &String) -> Result<f64, Infallible> {
///         Ok((a.len() as f64 - b.len() as f64).abs())
///     }
/// }
///
/// let d = LengthGap.dissimilarity(&"ab".into(), &"abcd".into()).unwrap();
/// assert_eq!(d, 2.0);
/// ```
pub trait Dissimilarity<T>: Send + Sync {
    /// Error produced when the measure cannot compare two items.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Dissimilarity of `a` to `b`. Must be non-negative.
    fn dissimilarity(&self, a: &T, b: &T) -> Result<f64, Self::Error>;

    /// Draw one split reference from `subset` (indices into `items`).
    ///
    /// The default draws uniformly at random and ignores the items.
    ///
    /// # Panics
    ///
    /// Panics if `subset` is empty. Callers guarantee a non-empty subset at
    /// every split.
    fn pick_reference<R: Rng + ?Sized>(&self, items: &[T], subset: &[u32], rng: &mut R) -> u32 {
        let _ = items;
        assert!(!subset.is_empty(), "cannot pick a split reference from an empty subset");
        subset[rng.gen_range(0..subset.len())]
    }
}

impl<T, D: Dissimilarity<T>> Dissimilarity<T> for &D {
    type Error = D::Error;

    #[inline]
    fn dissimilarity(&self, a: &T, b: &T) -> Result<f64, Self::Error> {
        (**self).dissimilarity(a, b)
    }

    #[inline]
    fn pick_reference<R: Rng + ?Sized>(&self, items: &[T], subset: &[u32], rng: &mut R) -> u32 {
        (**self).pick_reference(items, subset, rng)
    }
}

// =============================================================================
// Split predicate
// =============================================================================

/// Which of the two split references an item is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Nearer to (or tied with) reference A. Left child.
    A,
    /// Strictly nearer to reference B. Right child.
    B,
}

/// The split predicate shared by tree building and traversal.
///
/// `x` goes to A when `d(x, a) <= d(x, b)`, so ties always resolve to A.
#[inline]
pub fn nearer<T, D: Dissimilarity<T> + ?Sized>(
    measure: &D,
    x: &T,
    a: &T,
    b: &T,
) -> Result<Side, D::Error> {
    let to_a = measure.dissimilarity(x, a)?;
    let to_b = measure.dissimilarity(x, b)?;
    Ok(if to_a <= to_b { Side::A } else { Side::B })
}

// =============================================================================
// Closure adapters
// =============================================================================

/// Infallible measure backed by a closure. Build with [`from_fn`].
#[derive(Clone, Copy)]
pub struct FnDissimilarity<F> {
    f: F,
}

/// Wrap `Fn(&T, &T) -> f64` as a [`Dissimilarity`].
///
/// ```
/// use genif::measure::{from_fn, Dissimilarity};
///
/// let gap = from_fn(|a: &i64, b: &i64| (a - b).abs() as f64);
/// assert_eq!(gap.dissimilarity(&3, &-4).unwrap(), 7.0);
/// ```
pub fn from_fn<T, F>(f: F) -> FnDissimilarity<F>
where
    F: Fn(&T, &T) -> f64 + Send + Sync,
{
    FnDissimilarity { f }
}

impl<T, F> Dissimilarity<T> for FnDissimilarity<F>
where
    F: Fn(&T, &T) -> f64 + Send + Sync,
{
    type Error = Infallible;

    #[inline]
    fn dissimilarity(&self, a: &T, b: &T) -> Result<f64, Infallible> {
        Ok((self.f)(a, b))
    }
}

/// Fallible measure backed by a closure. Build with [`from_fallible_fn`].
pub struct TryFnDissimilarity<F, E> {
    f: F,
    _error: PhantomData<fn() -> E>,
}

/// Wrap `Fn(&T, &T) -> Result<f64, E>` as a [`Dissimilarity`].
pub fn from_fallible_fn<T, E, F>(f: F) -> TryFnDissimilarity<F, E>
where
    E: std::error::Error + Send + Sync + 'static,
    F: Fn(&T, &T) -> Result<f64, E> + Send + Sync,
{
    TryFnDissimilarity {
        f,
        _error: PhantomData,
    }
}

impl<T, E, F> Dissimilarity<T> for TryFnDissimilarity<F, E>
where
    E: std::error::Error + Send + Sync + 'static,
    F: Fn(&T, &T) -> Result<f64, E> + Send + Sync,
{
    type Error = E;

    #[inline]
    fn dissimilarity(&self, a: &T, b: &T) -> Result<f64, E> {
        (self.f)(a, b)
    }
}
