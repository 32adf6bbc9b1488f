//! Lock state and core progress types
//!
//! `LockState` is the single owner of the secret and the player's progress
//! against it. Only validation commits and regeneration write to it.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::combination::{SecretCombination, Step, generate};
use crate::error::ConfigError;

/// Status of the current attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    /// Accepting input
    #[default]
    Normal,
    /// Full combination entered; terminal for this secret
    Win,
    /// Wrong direction entered; terminal for this secret
    Failure,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Normal => "normal",
            GameStatus::Win => "win",
            GameStatus::Failure => "failure",
        }
    }

    /// True for `Win` and `Failure`
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::Normal)
    }
}

/// Player progress against the current secret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressState {
    /// Index of the step being entered (equals the secret length on a win)
    pub current_step: usize,
    /// Correct-direction turns made on the current step
    pub rotations: u32,
    pub status: GameStatus,
}

/// Aggregate game state: the secret plus progress against it
#[derive(Debug, Clone, Serialize)]
pub struct LockState {
    secret: SecretCombination,
    progress: ProgressState,
    /// Number of secrets generated so far, including the current one
    generation: u64,
}

impl LockState {
    /// Start a fresh attempt against `secret`
    pub fn new(secret: SecretCombination) -> Self {
        Self {
            secret,
            progress: ProgressState::default(),
            generation: 1,
        }
    }

    /// Generate the initial secret
    pub fn generate<R: Rng + ?Sized>(
        length: u32,
        max_rotations: u32,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(generate(length, max_rotations, rng)?))
    }

    pub fn secret(&self) -> &SecretCombination {
        &self.secret
    }

    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    pub fn status(&self) -> GameStatus {
        self.progress.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The step currently expected, `None` once the secret is complete
    pub fn expected_step(&self) -> Option<&Step> {
        self.secret.step(self.progress.current_step)
    }

    /// Replace the secret and clear progress in one assignment.
    ///
    /// Only allowed once the attempt is over; returns `Ok(false)` and leaves
    /// everything untouched while the status is still `Normal`.
    pub fn regenerate<R: Rng + ?Sized>(
        &mut self,
        length: u32,
        max_rotations: u32,
        rng: &mut R,
    ) -> Result<bool, ConfigError> {
        if !self.progress.status.is_terminal() {
            log::debug!("Regeneration skipped: attempt still in progress");
            return Ok(false);
        }

        let secret = generate(length, max_rotations, rng)?;
        *self = Self {
            secret,
            progress: ProgressState::default(),
            generation: self.generation + 1,
        };
        Ok(true)
    }

    pub(super) fn set_progress(&mut self, progress: ProgressState) {
        self.progress = progress;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Direction;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn fixed() -> LockState {
        LockState::new(
            SecretCombination::from_steps(vec![Step::new(3, Direction::Clockwise)]).unwrap(),
        )
    }

    #[test]
    fn test_new_state_is_normal() {
        let state = fixed();
        assert_eq!(state.status(), GameStatus::Normal);
        assert_eq!(state.progress().current_step, 0);
        assert_eq!(state.progress().rotations, 0);
        assert_eq!(state.generation(), 1);
        assert_eq!(state.expected_step().map(|s| s.count()), Some(3));
    }

    #[test]
    fn test_regenerate_refused_while_normal() {
        let mut state = fixed();
        let before = state.secret().clone();
        let mut rng = Pcg32::seed_from_u64(9);
        assert!(!state.regenerate(3, 9, &mut rng).unwrap());
        assert_eq!(state.secret(), &before);
        assert_eq!(state.generation(), 1);
    }

    #[test]
    fn test_regenerate_resets_everything_together() {
        let mut state = fixed();
        state.set_progress(ProgressState {
            current_step: 0,
            rotations: 2,
            status: GameStatus::Failure,
        });

        let mut rng = Pcg32::seed_from_u64(9);
        assert!(state.regenerate(4, 9, &mut rng).unwrap());
        assert_eq!(state.progress(), &ProgressState::default());
        assert_eq!(state.secret().len(), 4);
        assert_eq!(state.generation(), 2);
    }

    #[test]
    fn test_regenerate_propagates_config_error() {
        let mut state = fixed();
        state.set_progress(ProgressState {
            status: GameStatus::Win,
            current_step: 1,
            rotations: 0,
        });
        let mut rng = Pcg32::seed_from_u64(9);
        assert!(state.regenerate(0, 9, &mut rng).is_err());
        // Failed regeneration leaves the finished attempt in place
        assert_eq!(state.status(), GameStatus::Win);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!GameStatus::Normal.is_terminal());
        assert!(GameStatus::Win.is_terminal());
        assert!(GameStatus::Failure.is_terminal());
    }
}
