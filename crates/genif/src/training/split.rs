//! Split strategies: choose two references and partition a subset.
//!
//! A strategy only ever looks at items through the [`Dissimilarity`] it is
//! given. Both built-in strategies route with [`nearer`], so an item goes to
//! reference A when `d(x, a) <= d(x, b)`.
//!
//! - [`RandomPairSplit`]: two distinct references drawn uniformly (default)
//! - [`FarthestPairSplit`]: A uniformly, B the member farthest from A

use rand::Rng;

use crate::measure::{Dissimilarity, Side, nearer};

// ============================================================================
// SplitOutcome
// ============================================================================

/// A successful partition of a subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    /// Dataset index of reference A.
    pub reference_a: u32,
    /// Dataset index of reference B.
    pub reference_b: u32,
    /// Members routed to A, in subset order. Never empty.
    pub near_a: Vec<u32>,
    /// Members routed to B, in subset order. Never empty.
    pub near_b: Vec<u32>,
}

/// Result of asking a strategy to split a subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitOutcome {
    Split(Split),
    /// No two distinguishable references were found, or one side came out
    /// empty. The builder turns the subset into a leaf.
    Homogeneous,
}

/// Chooses references for a subset and partitions it.
pub trait SplitStrategy: Send + Sync {
    /// Split `subset` (indices into `items`, at least two of them).
    ///
    /// # Errors
    ///
    /// Returns the measure's error unchanged.
    fn split<T, D, R>(
        &self,
        items: &[T],
        subset: &[u32],
        measure: &D,
        rng: &mut R,
    ) -> Result<SplitOutcome, D::Error>
    where
        D: Dissimilarity<T>,
        R: Rng + ?Sized;
}

/// Route every member of `subset` to A or B.
pub fn partition<T, D: Dissimilarity<T>>(
    items: &[T],
    subset: &[u32],
    measure: &D,
    reference_a: u32,
    reference_b: u32,
) -> Result<SplitOutcome, D::Error> {
    let a = &items[reference_a as usize];
    let b = &items[reference_b as usize];
    let mut near_a = Vec::with_capacity(subset.len());
    let mut near_b = Vec::with_capacity(subset.len());
    for &idx in subset {
        match nearer(measure, &items[idx as usize], a, b)? {
            Side::A => near_a.push(idx),
            Side::B => near_b.push(idx),
        }
    }
    if near_a.is_empty() || near_b.is_empty() {
        return Ok(SplitOutcome::Homogeneous);
    }
    Ok(SplitOutcome::Split(Split {
        reference_a,
        reference_b,
        near_a,
        near_b,
    }))
}

// ============================================================================
// RandomPairSplit
// ============================================================================

/// Draw A, then redraw B until it differs from A.
///
/// B differs when it is another subset member and `d(a, b) > 0` or
/// `d(b, a) > 0`. After `max_attempts` failed draws, B is the first member in
/// subset order that differs from A. The subset is homogeneous only when no
/// such member exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomPairSplit {
    pub max_attempts: u32,
}

impl RandomPairSplit {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }
}

impl Default for RandomPairSplit {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS)
    }
}

impl SplitStrategy for RandomPairSplit {
    fn split<T, D, R>(
        &self,
        items: &[T],
        subset: &[u32],
        measure: &D,
        rng: &mut R,
    ) -> Result<SplitOutcome, D::Error>
    where
        D: Dissimilarity<T>,
        R: Rng + ?Sized,
    {
        if subset.len() < 2 {
            return Ok(SplitOutcome::Homogeneous);
        }
        let a = measure.pick_reference(items, subset, rng);
        for _ in 0..self.max_attempts {
            let b = measure.pick_reference(items, subset, rng);
            if b != a && distinguishable(items, measure, a, b)? {
                return partition(items, subset, measure, a, b);
            }
        }
        // Draws ran out; only a subset with no member distinguishable from A
        // is homogeneous.
        for &b in subset {
            if b != a && distinguishable(items, measure, a, b)? {
                return partition(items, subset, measure, a, b);
            }
        }
        Ok(SplitOutcome::Homogeneous)
    }
}

/// `d(a, b) > 0` or `d(b, a) > 0`.
fn distinguishable<T, D: Dissimilarity<T>>(
    items: &[T],
    measure: &D,
    a: u32,
    b: u32,
) -> Result<bool, D::Error> {
    let (item_a, item_b) = (&items[a as usize], &items[b as usize]);
    Ok(measure.dissimilarity(item_a, item_b)? > 0.0 || measure.dissimilarity(item_b, item_a)? > 0.0)
}

// ============================================================================
// FarthestPairSplit
// ============================================================================

/// Draw A, then take the subset member farthest from A as B.
///
/// Far-away items become a reference as soon as they share a subset with A,
/// which isolates them in very few splits. Ties for the farthest member go to
/// the first in subset order. A subset with `d(a, x) = 0` for every member is
/// homogeneous.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FarthestPairSplit;

impl SplitStrategy for FarthestPairSplit {
    fn split<T, D, R>(
        &self,
        items: &[T],
        subset: &[u32],
        measure: &D,
        rng: &mut R,
    ) -> Result<SplitOutcome, D::Error>
    where
        D: Dissimilarity<T>,
        R: Rng + ?Sized,
    {
        if subset.len() < 2 {
            return Ok(SplitOutcome::Homogeneous);
        }
        let a = measure.pick_reference(items, subset, rng);
        let item_a = &items[a as usize];

        let mut farthest: Option<(u32, f64)> = None;
        for &idx in subset {
            if idx == a {
                continue;
            }
            let d = measure.dissimilarity(item_a, &items[idx as usize])?;
            if farthest.is_none_or(|(_, best)| d > best) {
                farthest = Some((idx, d));
            }
        }

        match farthest {
            Some((b, d)) if d > 0.0 => partition(items, subset, measure, a, b),
            _ => Ok(SplitOutcome::Homogeneous),
        }
    }
}
