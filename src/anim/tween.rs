//! Tweens and effect timelines
//!
//! An `Effect` is a set of property tweens placed on one timeline. Tweens
//! whose time ranges overlap are the effect's parallel sub-effects; the
//! effect completes when its last tween ends.

use serde::{Deserialize, Serialize};

use super::scene::{Prop, Scene, SpriteId};

/// Easing curves (power N is a polynomial of degree N + 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ease {
    #[default]
    Linear,
    Power1In,
    Power1Out,
    Power1InOut,
    Power2In,
    Power2Out,
    Power2InOut,
    Power3In,
    Power3Out,
    Power3InOut,
}

#[derive(Clone, Copy)]
enum Shape {
    In,
    Out,
    InOut,
}

impl Ease {
    /// Map linear progress in `[0, 1]` to eased progress. Exact at both ends.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let (degree, shape) = match self {
            Ease::Linear => return t,
            Ease::Power1In => (2, Shape::In),
            Ease::Power1Out => (2, Shape::Out),
            Ease::Power1InOut => (2, Shape::InOut),
            Ease::Power2In => (3, Shape::In),
            Ease::Power2Out => (3, Shape::Out),
            Ease::Power2InOut => (3, Shape::InOut),
            Ease::Power3In => (4, Shape::In),
            Ease::Power3Out => (4, Shape::Out),
            Ease::Power3InOut => (4, Shape::InOut),
        };
        match shape {
            Shape::In => t.powi(degree),
            Shape::Out => 1.0 - (1.0 - t).powi(degree),
            Shape::InOut => {
                if t < 0.5 {
                    (2.0 * t).powi(degree) / 2.0
                } else {
                    1.0 - (2.0 - 2.0 * t).powi(degree) / 2.0
                }
            }
        }
    }
}

/// Where a tween ends up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Target {
    /// Absolute value
    To(f32),
    /// Offset from the value the property has when the tween starts
    By(f32),
    /// Offset from another sprite's value of the same property, read when
    /// the effect starts
    Follow { sprite: SpriteId, delta: f32 },
}

impl Target {
    /// End value given the property's value at tween start. An unanchored
    /// `Follow` behaves like `By`.
    pub fn resolve(&self, current: f32) -> f32 {
        match *self {
            Target::To(v) => v,
            Target::By(delta) | Target::Follow { delta, .. } => current + delta,
        }
    }

    /// Pin a `Follow` target to the followed sprite's current value
    pub fn anchor(self, scene: &Scene, prop: Prop) -> Target {
        match self {
            Target::Follow { sprite, delta } => Target::To(scene.get(sprite, prop) + delta),
            other => other,
        }
    }
}

/// One property animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    pub sprite: SpriteId,
    pub prop: Prop,
    pub target: Target,
    /// Seconds
    pub duration: f32,
    pub ease: Ease,
}

impl Tween {
    pub fn to(sprite: SpriteId, prop: Prop, value: f32, duration: f32) -> Self {
        Self {
            sprite,
            prop,
            target: Target::To(value),
            duration: duration.max(0.0),
            ease: Ease::Linear,
        }
    }

    pub fn by(sprite: SpriteId, prop: Prop, delta: f32, duration: f32) -> Self {
        Self {
            target: Target::By(delta),
            ..Self::to(sprite, prop, 0.0, duration)
        }
    }

    /// Move to `delta` past where `leader` stands when the effect starts
    pub fn follow(sprite: SpriteId, prop: Prop, leader: SpriteId, delta: f32, duration: f32) -> Self {
        Self {
            target: Target::Follow {
                sprite: leader,
                delta,
            },
            ..Self::to(sprite, prop, 0.0, duration)
        }
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }
}

/// A tween placed on an effect's timeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placed {
    /// Seconds from the start of the effect
    pub start: f32,
    pub tween: Tween,
}

impl Placed {
    pub fn end(&self) -> f32 {
        self.start + self.tween.duration
    }
}

/// A named timeline of tweens
#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    name: &'static str,
    tweens: Vec<Placed>,
    /// Start of the most recently placed tween
    last_start: f32,
    /// End of the timeline, including holds
    end: f32,
}

impl Effect {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            tweens: Vec::new(),
            last_start: 0.0,
            end: 0.0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tweens(&self) -> &[Placed] {
        &self.tweens
    }

    /// Total length in seconds
    pub fn duration(&self) -> f32 {
        self.end
    }

    /// Append after everything placed so far
    pub fn then(self, tween: Tween) -> Self {
        let start = self.end;
        self.place(start, tween)
    }

    /// Run alongside the previously placed tween
    pub fn with(self, tween: Tween) -> Self {
        let start = self.last_start;
        self.place(start, tween)
    }

    /// Start `lag` seconds after the previously placed tween starts
    pub fn lagging(self, lag: f32, tween: Tween) -> Self {
        let start = self.last_start + lag.max(0.0);
        self.place(start, tween)
    }

    /// Extend the timeline with an idle gap
    pub fn hold(mut self, seconds: f32) -> Self {
        self.end += seconds.max(0.0);
        self
    }

    fn place(mut self, start: f32, tween: Tween) -> Self {
        let placed = Placed { start, tween };
        self.end = self.end.max(placed.end());
        self.last_start = start;
        self.tweens.push(placed);
        self
    }
}
