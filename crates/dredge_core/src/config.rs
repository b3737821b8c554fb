//! Scan configuration.

use crate::cancel::CancelToken;
use crate::finding::Redaction;

/// Default sliding-window width for entropy rules, in bytes.
pub const DEFAULT_ENTROPY_WINDOW_SIZE: usize = 20;

/// Default stride between entropy windows, in bytes.
pub const DEFAULT_ENTROPY_WINDOW_STEP: usize = 4;

/// Sliding-window geometry for entropy rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntropyWindows {
    /// Window width in bytes.
    pub size: usize,
    /// Stride between consecutive window starts, in bytes. A stride of zero
    /// is treated as one.
    pub step: usize,
}

impl Default for EntropyWindows {
    fn default() -> Self {
        Self {
            size: DEFAULT_ENTROPY_WINDOW_SIZE,
            step: DEFAULT_ENTROPY_WINDOW_STEP,
        }
    }
}

impl EntropyWindows {
    /// Stride with the zero case clamped away.
    #[must_use]
    pub const fn effective_step(&self) -> usize {
        if self.step == 0 { 1 } else { self.step }
    }
}

/// Configuration for a scan run.
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Number of worker threads. `None` uses the process-wide default pool.
    pub worker_count: Option<usize>,
    /// Sliding-window geometry for entropy rules.
    pub entropy_windows: EntropyWindows,
    /// How matched secrets are rendered in findings.
    pub redaction: Redaction,
    /// Token checked cooperatively between content units and between rules.
    pub cancel: CancelToken,
}

impl ScanConfig {
    /// Creates a configuration with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit worker thread count.
    #[must_use]
    pub const fn with_worker_count(mut self, count: usize) -> Self {
        self.worker_count = Some(count);
        self
    }

    /// Sets the entropy window geometry.
    #[must_use]
    pub const fn with_entropy_windows(mut self, windows: EntropyWindows) -> Self {
        self.entropy_windows = windows;
        self
    }

    /// Sets the redaction mode.
    #[must_use]
    pub const fn with_redaction(mut self, redaction: Redaction) -> Self {
        self.redaction = redaction;
        self
    }

    /// Attaches a cancellation token shared with the caller.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }
}
