//! Lightweight stage timing.
//!
//! Timers always measure; whether the result shows up depends on the
//! tracing filter (`RUST_LOG=debug` or `SP_TIMING` set in the environment).

use std::time::Instant;

/// Check if timing output was requested through the environment.
pub fn is_enabled() -> bool {
    std::env::var("SP_TIMING").is_ok()
}

/// A simple timer that measures elapsed time for one pipeline stage.
pub struct Timer {
    label: &'static str,
    start: Instant,
}

impl Timer {
    /// Create and start a new timer with the given label.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }

    /// Elapsed time in seconds without stopping.
    pub fn elapsed_s(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// Stop the timer and report the elapsed time.
    ///
    /// Reported at `info` when `SP_TIMING` is set, otherwise at `debug`.
    pub fn stop_and_log(self) -> f64 {
        let elapsed = self.elapsed_s();
        if is_enabled() {
            tracing::info!(stage = self.label, elapsed_s = elapsed, "stage timing");
        } else {
            tracing::debug!(stage = self.label, elapsed_s = elapsed, "stage timing");
        }
        elapsed
    }
}
