//! Common utilities used across the crate.
//!
//! This module provides the parallelism flag threaded through fitting and
//! scoring, and the thread pool setup used by the model API.

use rayon::prelude::*;

// =============================================================================
// Parallelism Configuration
// =============================================================================

/// Whether tree building and batch scoring may fan out over rayon.
///
/// The pool itself is owned by [`run_with_threads`] at the model level; the
/// trainer and scorer only read this flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parallelism {
    Sequential,
    Parallel,
}

impl Parallelism {
    /// Create from thread count semantics.
    ///
    /// - 0 = auto (parallel if rayon pool has multiple threads, sequential otherwise)
    /// - 1 = sequential
    /// - >1 = parallel
    #[inline]
    pub fn from_threads(n_threads: usize) -> Self {
        if n_threads == 1 || (n_threads == 0 && rayon::current_num_threads() == 1) {
            Parallelism::Sequential
        } else {
            Parallelism::Parallel
        }
    }

    /// Returns `true` if parallel execution is allowed.
    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }

    /// Order-preserving map that stops at the first error.
    ///
    /// In parallel mode other workers finish the item they are on and pick up
    /// no new work. If several items fail concurrently, any of their errors
    /// may be returned.
    #[inline]
    pub fn maybe_par_try_map<T, B, E, I, F>(self, iter: I, f: F) -> Result<Vec<B>, E>
    where
        T: Send,
        B: Send,
        E: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        F: Fn(T) -> Result<B, E> + Sync + Send,
    {
        if self.is_parallel() {
            iter.into_par_iter().map(f).collect()
        } else {
            iter.into_iter().map(f).collect()
        }
    }
}

// =============================================================================
// Thread Pool Setup
// =============================================================================

/// Run a closure with the appropriate thread pool.
///
/// Thread count semantics:
/// - `0` = auto (use all available cores)
/// - `1` = sequential (no thread pool)
/// - `n > 1` = use exactly `n` threads
///
/// # Errors
///
/// Returns the pool construction error if a dedicated pool was requested and
/// could not be created.
///
/// # Example
///
/// ```
/// use genif::run_with_threads;
///
/// let sum = run_with_threads(1, |_| (0..10).sum::<i32>()).unwrap();
/// assert_eq!(sum, 45);
/// ```
#[inline]
pub fn run_with_threads<T: Send>(
    n_threads: usize,
    f: impl FnOnce(Parallelism) -> T + Send,
) -> Result<T, rayon::ThreadPoolBuildError> {
    let parallelism = Parallelism::from_threads(n_threads);

    match parallelism {
        Parallelism::Sequential => Ok(f(Parallelism::Sequential)),
        Parallelism::Parallel => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n_threads)
                .build()?;
            Ok(pool.install(|| f(Parallelism::Parallel)))
        }
    }
}
