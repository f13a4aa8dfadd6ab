use eth_bench_core::dispatcher::{Observer, RunState};
use eth_bench_core::types::{RequestResult, WorkUnit};
use eth_bench_core::Error as CoreError;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicU64, Ordering};

const TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}";

/// Single line progress bar over the finished requests of a run.
pub struct ProgressReporter {
    bar: ProgressBar,
    failures: AtomicU64,
}

impl ProgressReporter {
    pub fn new(total_requests: u64, enabled: bool) -> Self {
        let bar = if enabled {
            ProgressBar::new(total_requests)
        } else {
            ProgressBar::hidden()
        };

        match ProgressStyle::with_template(TEMPLATE) {
            Ok(style) => bar.set_style(style.progress_chars("#>-")),
            Err(e) => log::warn!("invalid progress bar template: {}", e),
        }

        Self {
            bar,
            failures: AtomicU64::new(0),
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}

impl Observer for ProgressReporter {
    fn on_success(&self, _unit: &WorkUnit, _result: &RequestResult) {
        self.bar.inc(1);
    }

    fn on_failure(&self, _unit: &WorkUnit, _error: &CoreError) {
        let failures = self.failures.fetch_add(1, Ordering::Relaxed) + 1;
        self.bar.set_message(format!("{} failed", failures));
        self.bar.inc(1);
    }

    fn on_done(&self, _run: &RunState) {
        self.bar.finish_and_clear();
    }
}
