//! Per-scan options: concurrency, callbacks and cancellation.

use crate::detector::DetectedApp;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Default number of repositories detected concurrently.
///
/// Each detection can issue up to roughly ten HTTP calls of its own, so the
/// repository-level bound is what keeps a large account from fanning out into
/// hundreds of simultaneous connections and burning API rate limit.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Progress callback: `(settled, total, current repository)`.
///
/// Fired before each repository's detection starts, and once more with
/// `(total, total, None)` after the whole list has been processed.
pub type ProgressCallback = Box<dyn Fn(usize, usize, Option<&str>) + Send + Sync>;

/// Detection callback, fired for every app as it is found.
pub type AppDetectedCallback = Box<dyn Fn(&DetectedApp) + Send + Sync>;

/// Cooperative cancellation flag for an in-flight fleet scan.
///
/// Clones share the flag. The scanner checks it at every chunk boundary;
/// cancelling stops new detections from being scheduled and the scan returns
/// the partial summary gathered so far.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates a fresh, uncancelled flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Options for one fleet scan invocation.
pub struct ScanOptions {
    concurrency: usize,
    cancel: CancelFlag,
    on_progress: Option<ProgressCallback>,
    on_app_detected: Option<AppDetectedCallback>,
}

impl ScanOptions {
    /// Creates options with the default concurrency and no callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            cancel: CancelFlag::new(),
            on_progress: None,
            on_app_detected: None,
        }
    }

    /// Sets the number of repositories detected concurrently (at least 1).
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Attaches a cancellation flag shared with the caller.
    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Registers a progress callback.
    #[must_use]
    pub fn on_progress(
        mut self,
        callback: impl Fn(usize, usize, Option<&str>) + Send + Sync + 'static,
    ) -> Self {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// Registers a callback fired for each detected app.
    #[must_use]
    pub fn on_app_detected(
        mut self,
        callback: impl Fn(&DetectedApp) + Send + Sync + 'static,
    ) -> Self {
        self.on_app_detected = Some(Box::new(callback));
        self
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns true once the attached flag has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Fires the progress callback, containing any panic it raises.
    ///
    /// Callbacks are caller-supplied and fire-and-forget; a broken one must
    /// not be able to abort the scan or corrupt its aggregation.
    pub(crate) fn emit_progress(&self, settled: usize, total: usize, current: Option<&str>) {
        if let Some(callback) = &self.on_progress {
            if catch_unwind(AssertUnwindSafe(|| callback(settled, total, current))).is_err() {
                warn!("Progress callback panicked");
            }
        }
    }

    /// Fires the detection callback, containing any panic it raises.
    pub(crate) fn emit_app_detected(&self, app: &DetectedApp) {
        if let Some(callback) = &self.on_app_detected {
            if catch_unwind(AssertUnwindSafe(|| callback(app))).is_err() {
                warn!(repo = %app.repo_full_name, "App-detected callback panicked");
            }
        }
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::new()
    }
}
