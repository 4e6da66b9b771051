//! Progress reporting for record loading.
//!
//! [`ProgressCallback`] keeps the loader independent of how progress is
//! shown. The CLI plugs in `indicatif` bars; library callers and tests use
//! [`NullProgress`].

use std::sync::Arc;

/// Receives progress updates while a data file is being read.
pub trait ProgressCallback: Send + Sync {
    /// Advance progress by `delta` records.
    fn inc(&self, delta: u64);

    /// Update the message displayed alongside the progress indicator.
    fn set_message(&self, msg: String);

    /// Mark progress as complete with a final message.
    fn finish(&self, msg: String);
}

/// Ignores all progress updates.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`] instance for convenient use.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
