//! Human-readable progress reporting
//!
//! Sinks are write-only and infallible; reporting never affects gameplay.

use std::cell::RefCell;
use std::time::Duration;

use crate::sim::{LockState, SecretCombination, Step, ValidationResult};

/// Receives progress and outcome messages
pub trait DiagnosticsSink {
    fn emit(&self, message: &str);
}

/// Forwards messages to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn emit(&self, message: &str) {
        log::info!(target: "vault_lock::diagnostics", "{}", message);
    }
}

/// Keeps messages in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: RefCell<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages.borrow().iter().any(|m| m.contains(needle))
    }
}

impl DiagnosticsSink for MemorySink {
    fn emit(&self, message: &str) {
        // A re-entrant emit from inside a borrow is dropped rather than panicking
        if let Ok(mut messages) = self.messages.try_borrow_mut() {
            messages.push(message.to_string());
        }
    }
}

impl<T: DiagnosticsSink + ?Sized> DiagnosticsSink for std::rc::Rc<T> {
    fn emit(&self, message: &str) {
        (**self).emit(message)
    }
}

pub fn secret_summary(secret: &SecretCombination) -> String {
    format!("Secret combination: {}", secret)
}

/// Progress line after an accepted, non-terminal input
pub fn progress_line(state: &LockState, result: &ValidationResult) -> String {
    let progress = state.progress();
    let total = state.secret().len();
    match state.expected_step() {
        Some(step) if result.step_advanced => format!(
            "Step {}/{} complete, next: {}",
            progress.current_step, total, describe(step)
        ),
        Some(step) => format!(
            "Step {}/{}: {}/{} {}",
            progress.current_step + 1,
            total,
            progress.rotations,
            step.count(),
            step.direction()
        ),
        None => format!("Step {}/{} complete", progress.current_step, total),
    }
}

pub fn win_line(elapsed: Duration) -> String {
    format!("Vault opened in {:.2}s", elapsed.as_secs_f32())
}

pub fn failure_line(state: &LockState) -> String {
    match state.expected_step() {
        Some(step) => format!(
            "Wrong direction on step {}, expected {}. Resetting",
            state.progress().current_step + 1,
            step.direction()
        ),
        None => "Wrong direction. Resetting".to_string(),
    }
}

fn describe(step: &Step) -> String {
    format!("{} x {}", step.count(), step.direction())
}
