//! Game settings
//!
//! Read once at startup (optionally from a JSON file) and never mutated
//! afterwards. Every field falls back to the defaults in [`crate::consts`].

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Longest accepted stage duration or dwell (seconds)
pub const MAX_DURATION_SECS: f32 = 3600.0;

/// Timings and angles for every animation stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Handle turn per accepted input (radians)
    pub handle_increment: f32,
    /// Handle turn duration (seconds)
    pub handle_turn: f32,
    /// Shadow turn duration (seconds)
    pub shadow_turn: f32,
    /// Celebration/punishment spin in multiples of π
    pub spin_rotations: u32,
    /// Spin duration (seconds)
    pub handle_spin: f32,
    /// Handle fade around door movement (seconds)
    pub handle_fade: f32,
    /// Door slide and cross-fade duration (seconds)
    pub door_move: f32,
    /// Horizontal door slide when opening (scene units)
    pub door_open_offset: f32,
    /// Glitter fade in/out (seconds)
    pub glitter_fade: f32,
    /// Glitter hold at full opacity (seconds)
    pub glitter_pause: f32,
    /// Dwell between reward effect and door close (seconds)
    pub win_dwell: f32,
    /// Engine frame rate
    pub frame_rate: u32,
    /// Abandon a stage still running this long past its nominal length (seconds)
    pub stage_timeout: f32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            handle_increment: HANDLE_INCREMENT,
            handle_turn: HANDLE_TURN_SECS,
            shadow_turn: SHADOW_TURN_SECS,
            spin_rotations: HANDLE_SPIN_ROTATIONS,
            handle_spin: HANDLE_SPIN_SECS,
            handle_fade: HANDLE_FADE_SECS,
            door_move: DOOR_MOVE_SECS,
            door_open_offset: DOOR_OPEN_OFFSET,
            glitter_fade: GLITTER_FADE_SECS,
            glitter_pause: GLITTER_PAUSE_SECS,
            win_dwell: WIN_DWELL_SECS,
            frame_rate: FRAME_RATE,
            stage_timeout: STAGE_TIMEOUT_SECS,
        }
    }
}

impl AnimationSettings {
    /// Settings with every stage instantaneous (for headless runs)
    pub fn instant() -> Self {
        Self {
            handle_turn: 0.0,
            shadow_turn: 0.0,
            handle_spin: 0.0,
            handle_fade: 0.0,
            door_move: 0.0,
            glitter_fade: 0.0,
            glitter_pause: 0.0,
            win_dwell: 0.0,
            ..Self::default()
        }
    }

    /// Total spin angle for celebration/punishment (radians)
    pub fn spin_angle(&self) -> f32 {
        std::f32::consts::PI * self.spin_rotations as f32
    }

    pub fn win_dwell_duration(&self) -> Duration {
        secs(self.win_dwell)
    }

    pub fn stage_timeout_duration(&self) -> Duration {
        secs(self.stage_timeout)
    }

    /// Time between engine frames
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate.max(1) as f64)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_rate == 0 {
            return Err(ConfigError::InvalidFrameRate(self.frame_rate));
        }
        let durations = [
            ("handle_turn", self.handle_turn),
            ("shadow_turn", self.shadow_turn),
            ("handle_spin", self.handle_spin),
            ("handle_fade", self.handle_fade),
            ("door_move", self.door_move),
            ("glitter_fade", self.glitter_fade),
            ("glitter_pause", self.glitter_pause),
            ("win_dwell", self.win_dwell),
            ("stage_timeout", self.stage_timeout),
        ];
        for (name, value) in durations {
            if !value.is_finite() || !(0.0..=MAX_DURATION_SECS).contains(&value) {
                return Err(ConfigError::InvalidDuration { name, value });
            }
        }
        Ok(())
    }
}

/// Convert seconds to a `Duration`, clamping negatives to zero and
/// saturating values too large to represent
pub(crate) fn secs(value: f32) -> Duration {
    Duration::try_from_secs_f32(value.max(0.0)).unwrap_or(Duration::MAX)
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Steps in each secret combination
    pub combination_length: u32,
    /// Maximum rotations per step
    pub max_rotations: u32,
    /// Ignore pointer presses while the handle is still turning. Off by
    /// default: every press is validated and only the overlapping turn is
    /// dropped.
    pub debounce_while_turning: bool,
    pub animation: AnimationSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            combination_length: COMBINATION_LENGTH,
            max_rotations: MAX_ROTATIONS,
            debounce_while_turning: false,
            animation: AnimationSettings::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields use defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Check the combination parameters and animation timings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.combination_length == 0 {
            return Err(ConfigError::ZeroLength);
        }
        if self.max_rotations == 0 {
            return Err(ConfigError::ZeroMaxRotations);
        }
        self.animation.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.combination_length, 3);
        assert_eq!(settings.max_rotations, 9);
        assert!(!settings.debounce_while_turning);
        assert!((settings.animation.spin_angle() - 4.0 * std::f32::consts::PI).abs() < 1e-5);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings =
            Settings::from_json(r#"{ "combination_length": 5, "animation": { "win_dwell": 1.5 } }"#)
                .unwrap();
        assert_eq!(settings.combination_length, 5);
        assert_eq!(settings.max_rotations, MAX_ROTATIONS);
        assert_eq!(settings.animation.win_dwell, 1.5);
        assert_eq!(settings.animation.handle_turn, HANDLE_TURN_SECS);
    }

    #[test]
    fn test_zero_length_rejected() {
        let err = Settings::from_json(r#"{ "combination_length": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroLength));
    }

    #[test]
    fn test_zero_max_rotations_rejected() {
        let err = Settings::from_json(r#"{ "max_rotations": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroMaxRotations));
    }

    #[test]
    fn test_negative_duration_rejected() {
        let err = Settings::from_json(r#"{ "animation": { "door_move": -1.0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidDuration {
                name: "door_move",
                ..
            }
        ));
    }

    #[test]
    fn test_huge_duration_rejected() {
        let err = Settings::from_json(r#"{ "animation": { "win_dwell": 1e20 } }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidDuration {
                name: "win_dwell",
                ..
            }
        ));
        let at_limit = format!(r#"{{ "animation": {{ "stage_timeout": {} }} }}"#, MAX_DURATION_SECS);
        assert!(Settings::from_json(&at_limit).is_ok());
    }

    #[test]
    fn test_secs_saturates() {
        assert_eq!(secs(-1.0), Duration::ZERO);
        assert_eq!(secs(f32::NAN), Duration::ZERO);
        assert_eq!(secs(1e20), Duration::MAX);
        assert_eq!(secs(f32::INFINITY), Duration::MAX);
        assert_eq!(secs(0.5), Duration::from_millis(500));
    }

    #[test]
    fn test_zero_frame_rate_rejected() {
        let err = Settings::from_json(r#"{ "animation": { "frame_rate": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFrameRate(0)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Settings::from_json("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_instant_has_no_durations() {
        let anim = AnimationSettings::instant();
        assert_eq!(anim.win_dwell_duration(), Duration::ZERO);
        assert!(anim.validate().is_ok());
    }
}
