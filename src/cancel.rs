//! Cooperative cancellation shared by the feeder, workers and coordinator.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A single-assignment stop flag.
///
/// Cancelling an already cancelled token is a no-op. Tasks poll
/// [`is_cancelled`](Self::is_cancelled) between units of work; nothing is
/// interrupted mid-computation.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the flag. Returns `true` only for the call that raised it.
    #[inline]
    pub fn cancel(&self) -> bool {
        self.cancelled.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok()
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
