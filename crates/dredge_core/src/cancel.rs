//! Cooperative cancellation for long-running scans.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

/// Shared cancellation flag checked at pipeline checkpoints.
///
/// Cloning is cheap; all clones observe the same flag. The orchestrator
/// checks the token before each content unit and between rules within a
/// unit, so a caller can abort a long scan without waiting for every unit
/// to finish. The core imposes no timeout of its own - deadline policy
/// belongs to the caller, which may cancel after one.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals cancellation to every clone of this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Marker error returned when a pipeline stops at a cancellation checkpoint.
#[derive(Debug, Error)]
#[error("scan cancelled")]
pub struct Cancelled;
