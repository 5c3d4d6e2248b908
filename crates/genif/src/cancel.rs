//! Cooperative cancellation for long fit and score calls.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag a caller flips to abort a running fit or score batch.
///
/// Clones share the same flag. The trainer polls it before each tree and the
/// scorer before each item; a cancelled call returns
/// [`Error::CancellationRequested`](crate::Error::CancellationRequested) and
/// drops whatever it had computed.
///
/// ```
/// use genif::CancelToken;
///
/// let token = CancelToken::new();
/// let remote = token.clone();
/// remote.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
