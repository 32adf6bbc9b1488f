//! Elapsed time for a round
//!
//! Uses tokio's clock so paused-time tests advance it deterministically.

use std::time::Duration;

use tokio::time::Instant;

/// Start/stop bounded monotonic clock
#[derive(Debug, Clone, Default)]
pub struct ElapsedTimer {
    started: Option<Instant>,
}

impl ElapsedTimer {
    pub fn new() -> Self {
        Self { started: None }
    }

    /// Start (or restart) timing from now
    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Stop timing and return the elapsed time at the moment of stopping
    pub fn stop(&mut self) -> Duration {
        self.started
            .take()
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// Stop without capturing
    pub fn reset(&mut self) {
        self.started = None;
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Elapsed time, zero when not running
    pub fn elapsed(&self) -> Duration {
        self.started.map(|t| t.elapsed()).unwrap_or(Duration::ZERO)
    }

    /// Elapsed milliseconds, 0 when not running
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }
}
