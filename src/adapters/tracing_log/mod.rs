// Tracing log adapter - Progress notifications as structured tracing events

use tracing::info;

use crate::domain::model::Phase;
use crate::ports::*;

/// Reports run progress through `tracing`
#[derive(Debug, Default)]
pub struct TracingProgressAdapter;

impl TracingProgressAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressReporter for TracingProgressAdapter {
    fn phase(&self, phase: Phase, detail: &str) {
        if detail.is_empty() {
            info!(phase = ?phase, "{}", phase);
        } else {
            info!(phase = ?phase, "{}: {}", phase, detail);
        }
    }

    fn fragment(&self, progress: &FragmentProgress) {
        info!(
            fragment = progress.count,
            planned = progress.planned,
            start = progress.interval.start,
            end = progress.interval.end,
            duration = progress.duration,
            total = progress.total,
            "Added clip: {} (Duration: {:.2}s, Total: {:.2}s)",
            progress.count,
            progress.duration,
            progress.total
        );
    }
}
