//! Deterministic combination module
//!
//! All puzzle logic lives here. This module must be pure and deterministic:
//! - Randomness only through a caller-supplied RNG
//! - Validation never mutates; progress changes only on commit
//! - No animation, timing or platform dependencies

pub mod combination;
pub mod state;
pub mod validate;

pub use combination::{Direction, SecretCombination, Step, generate};
pub use state::{GameStatus, LockState, ProgressState};
pub use validate::{Validation, ValidationResult, validate};
