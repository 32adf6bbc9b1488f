//! Vault Lock - A combination-lock vault puzzle
//!
//! Core modules:
//! - `sim`: Deterministic combination logic (generation, validation, state)
//! - `anim`: Animation stages, per-actor guards and the sequence orchestrator
//! - `controller`: Owns the game state and wires input to animations
//! - `timer`: Elapsed time tracking for a round
//! - `settings`: Data-driven game configuration

pub mod anim;
pub mod controller;
pub mod diagnostics;
pub mod error;
pub mod input;
pub mod settings;
pub mod sim;
pub mod timer;

pub use controller::{RoundOutcome, RoundStats, Submission, VaultController};
pub use error::{AnimationError, ConfigError};
pub use settings::{AnimationSettings, Settings};

/// Game configuration constants
pub mod consts {
    use std::f32::consts::PI;

    /// Number of steps in a secret combination
    pub const COMBINATION_LENGTH: u32 = 3;
    /// Maximum rotations a single step may require
    pub const MAX_ROTATIONS: u32 = 9;

    /// Pause between the reward effect and the door closing (seconds)
    pub const WIN_DWELL_SECS: f32 = 5.0;

    /// Handle turn per accepted input (radians)
    pub const HANDLE_INCREMENT: f32 = PI / 3.0;
    /// Handle turn duration (seconds)
    pub const HANDLE_TURN_SECS: f32 = 0.5;
    /// Handle shadow turn duration, starts with the handle (seconds)
    pub const SHADOW_TURN_SECS: f32 = 0.48;
    /// Celebration/punishment spin: multiples of π added to the handle
    pub const HANDLE_SPIN_ROTATIONS: u32 = 4;
    /// Spin duration (seconds)
    pub const HANDLE_SPIN_SECS: f32 = 1.0;
    /// Handle fade out/in around door movement (seconds)
    pub const HANDLE_FADE_SECS: f32 = 0.3;

    /// Door slide and cross-fade duration (seconds)
    pub const DOOR_MOVE_SECS: f32 = 0.5;
    /// Horizontal slide of the door when it swings open (scene units)
    pub const DOOR_OPEN_OFFSET: f32 = 460.0;
    /// Scale the closed door shrinks to, and the open door grows from
    pub const DOOR_SWAP_SCALE: f32 = 0.85;

    /// Glitter fade in/out duration (seconds)
    pub const GLITTER_FADE_SECS: f32 = 2.0;
    /// Glitter hold between fade in and fade out (seconds)
    pub const GLITTER_PAUSE_SECS: f32 = 0.1;

    /// Animation engine frame rate
    pub const FRAME_RATE: u32 = 60;
    /// Grace period past a stage's nominal length before it is abandoned (seconds)
    pub const STAGE_TIMEOUT_SECS: f32 = 10.0;
}
