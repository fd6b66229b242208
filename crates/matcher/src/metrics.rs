// Metrics hooks for the matcher.
//
// Install a global `MatchMetrics` implementation with [`set_match_metrics`];
// every `Matcher::run` then reports how many documents it compared, how many
// label searches it performed and how long the run took.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

/// Metrics observer for matching runs.
pub trait MatchMetrics: Send + Sync {
    /// Record one completed run.
    ///
    /// `documents` is the number of input documents, `comparisons` the number
    /// of (label, other document) searches, and `latency` the wall-clock time
    /// of the whole run including aggregation.
    fn record_match(&self, documents: usize, comparisons: usize, latency: Duration);
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn MatchMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn MatchMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn MatchMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global match metrics recorder.
pub fn set_match_metrics(recorder: Option<Arc<dyn MatchMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}
