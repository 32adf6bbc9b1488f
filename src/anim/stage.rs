//! Stage descriptors and the effects behind each stage
//!
//! Timings and angles come from [`AnimationSettings`]; the easing choices
//! are fixed per stage.

use std::time::Duration;

use super::guard::Actor;
use super::scene::{Prop, SpriteId};
use super::tween::{Ease, Effect, Tween};
use crate::consts::DOOR_SWAP_SCALE;
use crate::settings::{AnimationSettings, secs};
use crate::sim::Direction;

/// Shadow opacity while the handle turns
const TURN_SHADOW_ALPHA: f32 = 0.5;
/// Shadow opacity while the handle spins
const SPIN_SHADOW_ALPHA: f32 = 0.3;
/// Shadow lag behind the handle during a spin (seconds)
const SPIN_SHADOW_LAG: f32 = 0.01;

/// One awaited unit of a sequence
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Play an effect while holding the actor's guard
    Animate { actor: Actor, effect: Effect },
    /// Wait without animating anything
    Dwell { name: &'static str, duration: Duration },
}

impl Stage {
    pub fn animate(actor: Actor, effect: Effect) -> Self {
        Stage::Animate { actor, effect }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Animate { effect, .. } => effect.name(),
            Stage::Dwell { name, .. } => *name,
        }
    }

    pub fn actor(&self) -> Option<Actor> {
        match self {
            Stage::Animate { actor, .. } => Some(*actor),
            Stage::Dwell { .. } => None,
        }
    }
}

/// Turn the handle one increment; the shadow follows on a slightly shorter,
/// softer curve starting at the same moment
pub fn handle_turn(direction: Direction, settings: &AnimationSettings) -> Effect {
    let delta = settings.handle_increment * direction.sign();
    Effect::new("handle-turn")
        .then(
            Tween::by(SpriteId::Handle, Prop::Rotation, delta, settings.handle_turn)
                .ease(Ease::Power2Out),
        )
        .with(
            Tween::by(SpriteId::HandleShadow, Prop::Rotation, delta, settings.shadow_turn)
                .ease(Ease::Power1Out),
        )
        .with(
            Tween::to(SpriteId::HandleShadow, Prop::Alpha, TURN_SHADOW_ALPHA, settings.shadow_turn)
                .ease(Ease::Power1Out),
        )
}

/// Multi-rotation spin used for both celebration and punishment. The shadow
/// lands on the handle's final angle even if an earlier turn left it behind.
pub fn handle_spin(name: &'static str, settings: &AnimationSettings) -> Effect {
    let angle = settings.spin_angle();
    Effect::new(name)
        .then(
            Tween::by(SpriteId::Handle, Prop::Rotation, angle, settings.handle_spin)
                .ease(Ease::Power2InOut),
        )
        .lagging(
            SPIN_SHADOW_LAG.min(settings.handle_spin),
            Tween::follow(
                SpriteId::HandleShadow,
                Prop::Rotation,
                SpriteId::Handle,
                angle,
                settings.handle_spin,
            )
            .ease(Ease::Power1InOut),
        )
        .with(
            Tween::to(SpriteId::HandleShadow, Prop::Alpha, SPIN_SHADOW_ALPHA, settings.handle_spin)
                .ease(Ease::Power1InOut),
        )
}

/// Hide the handle, then slide the door while cross-fading closed to open
pub fn door_open(settings: &AnimationSettings) -> Effect {
    let t = settings.door_move;
    Effect::new("door-open")
        .then(Tween::to(SpriteId::Handle, Prop::Alpha, 0.0, settings.handle_fade).ease(Ease::Power2InOut))
        .then(Tween::by(SpriteId::Door, Prop::X, settings.door_open_offset, t).ease(Ease::Power2InOut))
        .with(Tween::to(SpriteId::ClosedDoor, Prop::Alpha, 0.0, t).ease(Ease::Power2InOut))
        .with(Tween::to(SpriteId::ClosedDoor, Prop::Scale, DOOR_SWAP_SCALE, t).ease(Ease::Power2InOut))
        .with(Tween::to(SpriteId::OpenDoor, Prop::Alpha, 1.0, t).ease(Ease::Power2InOut))
        .with(Tween::to(SpriteId::OpenDoor, Prop::Scale, 1.0, t).ease(Ease::Power2InOut))
        .with(Tween::to(SpriteId::OpenDoorShadow, Prop::Alpha, 1.0, t).ease(Ease::Power2InOut))
}

/// Reverse of [`door_open`]: slide back, cross-fade open to closed, then
/// show the handle again
pub fn door_close(settings: &AnimationSettings) -> Effect {
    let t = settings.door_move;
    Effect::new("door-close")
        .then(Tween::by(SpriteId::Door, Prop::X, -settings.door_open_offset, t).ease(Ease::Power2InOut))
        .with(Tween::to(SpriteId::OpenDoor, Prop::Alpha, 0.0, t).ease(Ease::Power2InOut))
        .with(Tween::to(SpriteId::OpenDoor, Prop::Scale, DOOR_SWAP_SCALE, t).ease(Ease::Power2InOut))
        .with(Tween::to(SpriteId::OpenDoorShadow, Prop::Alpha, 0.0, t).ease(Ease::Power2InOut))
        .with(Tween::to(SpriteId::ClosedDoor, Prop::Alpha, 1.0, t).ease(Ease::Power2InOut))
        .with(Tween::to(SpriteId::ClosedDoor, Prop::Scale, 1.0, t).ease(Ease::Power2InOut))
        .then(Tween::to(SpriteId::Handle, Prop::Alpha, 1.0, settings.handle_fade).ease(Ease::Power2InOut))
}

/// Glitter fades in, holds briefly, fades out
pub fn glitter(settings: &AnimationSettings) -> Effect {
    Effect::new("glitter")
        .then(Tween::to(SpriteId::Glitter, Prop::Scale, 0.8, 0.0))
        .then(Tween::to(SpriteId::Glitter, Prop::Alpha, 1.0, settings.glitter_fade).ease(Ease::Power3In))
        .hold(settings.glitter_pause)
        .then(Tween::to(SpriteId::Glitter, Prop::Alpha, 0.0, settings.glitter_fade).ease(Ease::Power3In))
}

/// Ordered stages after the final correct input. Stopping the timer
/// happens before these run; regeneration happens after.
pub fn win_stages(settings: &AnimationSettings) -> Vec<Stage> {
    vec![
        Stage::animate(Actor::Door, door_open(settings)),
        Stage::animate(Actor::Reward, glitter(settings)),
        Stage::Dwell {
            name: "win-dwell",
            duration: secs(settings.win_dwell),
        },
        Stage::animate(Actor::Door, door_close(settings)),
        Stage::animate(Actor::Handle, handle_spin("celebration-spin", settings)),
    ]
}

/// Ordered stages after a wrong-direction input
pub fn failure_stages(settings: &AnimationSettings) -> Vec<Stage> {
    vec![Stage::animate(
        Actor::Handle,
        handle_spin("punishment-spin", settings),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::tween::Target;
    use std::f32::consts::PI;

    #[test]
    fn test_win_stage_order() {
        let names: Vec<_> = win_stages(&AnimationSettings::default())
            .iter()
            .map(Stage::name)
            .collect();
        assert_eq!(
            names,
            vec!["door-open", "glitter", "win-dwell", "door-close", "celebration-spin"]
        );
    }

    #[test]
    fn test_failure_is_single_spin() {
        let stages = failure_stages(&AnimationSettings::default());
        assert_eq!(stages.len(), 1);
        assert_eq!(stages[0].actor(), Some(Actor::Handle));
        assert_eq!(stages[0].name(), "punishment-spin");
    }

    #[test]
    fn test_handle_turn_sign_follows_direction() {
        let settings = AnimationSettings::default();
        let cw = handle_turn(Direction::Clockwise, &settings);
        let ccw = handle_turn(Direction::CounterClockwise, &settings);
        let delta = |e: &Effect| match e.tweens()[0].tween.target {
            Target::By(d) => d,
            _ => panic!("handle turn must be relative"),
        };
        assert!((delta(&cw) - PI / 3.0).abs() < 1e-6);
        assert!((delta(&ccw) + PI / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_shadow_overlaps_handle_turn() {
        let effect = handle_turn(Direction::Clockwise, &AnimationSettings::default());
        let handle = effect.tweens()[0];
        let shadow = effect.tweens()[1];
        assert_eq!(shadow.tween.sprite, SpriteId::HandleShadow);
        assert!(shadow.start < handle.end());
        assert!((effect.duration() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_door_stage_durations() {
        let settings = AnimationSettings::default();
        assert!((door_open(&settings).duration() - 0.8).abs() < 1e-6);
        assert!((door_close(&settings).duration() - 0.8).abs() < 1e-6);
        assert!((glitter(&settings).duration() - 4.1).abs() < 1e-5);
    }
}
