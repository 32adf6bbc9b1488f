//! Per-input combination validation
//!
//! `validate` is a pure function of the secret, the current progress and one
//! input direction. It returns the verdict together with the progress the
//! input would produce; nothing changes until the caller commits it.

use serde::{Deserialize, Serialize};

use super::combination::{Direction, SecretCombination};
use super::state::{GameStatus, LockState, ProgressState};

/// Verdict for a single input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Input matched the expected direction
    pub accepted: bool,
    /// Input completed the current step
    pub step_advanced: bool,
    /// Input completed the final step
    pub sequence_complete: bool,
}

/// Uncommitted outcome of validating one input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validation {
    pub result: ValidationResult,
    /// Progress the input was validated against
    pub from: ProgressState,
    /// Progress after applying the input
    pub next: ProgressState,
}

impl Validation {
    /// Status the input leads to
    pub fn status(&self) -> GameStatus {
        self.next.status
    }
}

/// Validate `input` against `secret` given the current `progress`.
///
/// A wrong direction rejects the whole attempt: the result moves to
/// `Failure` and the step index and rotation counter stay where they were.
/// Progress that is already terminal (or points past the secret) is
/// returned unchanged with a rejected verdict.
pub fn validate(
    secret: &SecretCombination,
    progress: &ProgressState,
    input: Direction,
) -> Validation {
    let unchanged = Validation {
        result: ValidationResult::default(),
        from: *progress,
        next: *progress,
    };

    if progress.status.is_terminal() {
        return unchanged;
    }
    let Some(expected) = secret.step(progress.current_step) else {
        return unchanged;
    };

    if input != expected.direction() {
        return Validation {
            result: ValidationResult::default(),
            from: *progress,
            next: ProgressState {
                status: GameStatus::Failure,
                ..*progress
            },
        };
    }

    let rotations = progress.rotations + 1;
    if rotations < expected.count() {
        return Validation {
            result: ValidationResult {
                accepted: true,
                ..Default::default()
            },
            from: *progress,
            next: ProgressState {
                rotations,
                ..*progress
            },
        };
    }

    // Step complete
    let current_step = progress.current_step + 1;
    let sequence_complete = current_step == secret.len();
    Validation {
        result: ValidationResult {
            accepted: true,
            step_advanced: true,
            sequence_complete,
        },
        from: *progress,
        next: ProgressState {
            current_step,
            rotations: 0,
            status: if sequence_complete {
                GameStatus::Win
            } else {
                GameStatus::Normal
            },
        },
    }
}

impl LockState {
    /// Validate `input` against this state without changing it
    pub fn validate(&self, input: Direction) -> Validation {
        validate(self.secret(), self.progress(), input)
    }

    /// Apply a validation computed from the current progress.
    ///
    /// Returns the new status. A validation computed against stale progress
    /// is ignored.
    pub fn commit(&mut self, validation: &Validation) -> GameStatus {
        if validation.from == *self.progress() {
            self.set_progress(validation.next);
        } else {
            log::debug!("Discarding validation computed from stale progress");
        }
        self.status()
    }
}
