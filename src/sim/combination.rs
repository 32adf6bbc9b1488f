//! Secret combination types and generation
//!
//! A combination is an ordered list of steps, each a rotation count and a
//! direction. Randomness is always supplied by the caller so a seeded RNG
//! reproduces the same secret.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Dial rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Clockwise => "clockwise",
            Direction::CounterClockwise => "counterclockwise",
        }
    }

    /// Sign applied to angular increments (+1 for clockwise)
    #[inline]
    pub fn sign(&self) -> f32 {
        match self {
            Direction::Clockwise => 1.0,
            Direction::CounterClockwise => -1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of the secret: turn `count` times in `direction`.
///
/// Serialize-only: every value goes through [`Step::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Step {
    count: u32,
    direction: Direction,
}

impl Step {
    /// Create a step. A zero count is raised to 1.
    pub fn new(count: u32, direction: Direction) -> Self {
        Self {
            count: count.max(1),
            direction,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Draw a random step with a count in `[1, max_count]`
    pub fn random<R: Rng + ?Sized>(rng: &mut R, max_count: u32) -> Self {
        let count = rng.random_range(1..=max_count);
        let direction = if rng.random_bool(0.5) {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        };
        Self { count, direction }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.count, self.direction)
    }
}

/// The ordered steps the player must reproduce. Never mutated; a reset
/// replaces it wholesale. Serialize-only, like [`Step`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretCombination {
    steps: Vec<Step>,
}

impl SecretCombination {
    /// Build a combination from explicit steps (at least one)
    pub fn from_steps(steps: Vec<Step>) -> Result<Self, ConfigError> {
        if steps.is_empty() {
            return Err(ConfigError::ZeroLength);
        }
        Ok(Self { steps })
    }

    /// Number of steps (always >= 1)
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl fmt::Display for SecretCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

/// Generate a secret of `length` steps with counts drawn from `[1, max_count]`
pub fn generate<R: Rng + ?Sized>(
    length: u32,
    max_count: u32,
    rng: &mut R,
) -> Result<SecretCombination, ConfigError> {
    if length == 0 {
        return Err(ConfigError::ZeroLength);
    }
    if max_count == 0 {
        return Err(ConfigError::ZeroMaxRotations);
    }

    let steps = (0..length).map(|_| Step::random(rng, max_count)).collect();
    Ok(SecretCombination { steps })
}
