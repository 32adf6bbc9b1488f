//! Animation engine
//!
//! The orchestrator only needs one thing from an engine: play an effect and
//! signal when it has finished. `TweenEngine` does that by stepping tweens
//! on a fixed frame interval against a shared `Scene`.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use tokio::time::Instant;

use super::scene::Scene;
use super::tween::{Effect, Target};
use crate::error::AnimationError;

/// Plays effects and resolves once they complete
pub trait AnimationEngine {
    fn play(&self, effect: &Effect) -> impl Future<Output = Result<(), AnimationError>>;
}

impl<E: AnimationEngine> AnimationEngine for Rc<E> {
    fn play(&self, effect: &Effect) -> impl Future<Output = Result<(), AnimationError>> {
        (**self).play(effect)
    }
}

/// Frame-stepped tween player writing into a shared scene
#[derive(Debug, Clone)]
pub struct TweenEngine {
    scene: Rc<RefCell<Scene>>,
    frame: Duration,
}

impl TweenEngine {
    pub fn new(frame: Duration) -> Self {
        Self::with_scene(Rc::new(RefCell::new(Scene::new())), frame)
    }

    pub fn with_scene(scene: Rc<RefCell<Scene>>, frame: Duration) -> Self {
        Self {
            scene,
            frame: frame.max(Duration::from_millis(1)),
        }
    }

    /// Shared handle to the scene being animated
    pub fn scene(&self) -> Rc<RefCell<Scene>> {
        Rc::clone(&self.scene)
    }

    /// Targets with `Follow` pinned to the scene as it is right now
    fn anchor_targets(&self, effect: &Effect) -> Vec<Target> {
        let scene = self.scene.borrow();
        effect
            .tweens()
            .iter()
            .map(|placed| placed.tween.target.anchor(&scene, placed.tween.prop))
            .collect()
    }

    /// Apply every tween at `elapsed` seconds into the effect.
    ///
    /// Start values are captured the first time a tween becomes active, so
    /// relative targets build on whatever earlier effects left behind.
    /// Returns true once every tween has reached its end value.
    fn step(
        &self,
        effect: &Effect,
        targets: &[Target],
        resolved: &mut [Option<(f32, f32)>],
        elapsed: f32,
    ) -> bool {
        let mut scene = self.scene.borrow_mut();
        let mut finished = true;

        for ((placed, target), slot) in effect.tweens().iter().zip(targets).zip(resolved.iter_mut()) {
            let tween = &placed.tween;
            if elapsed < placed.start {
                finished = false;
                continue;
            }

            let (from, to) = *slot.get_or_insert_with(|| {
                let current = scene.get(tween.sprite, tween.prop);
                (current, target.resolve(current))
            });

            let progress = if tween.duration <= 0.0 {
                1.0
            } else {
                ((elapsed - placed.start) / tween.duration).clamp(0.0, 1.0)
            };

            if progress >= 1.0 {
                scene.set(tween.sprite, tween.prop, to);
            } else {
                let eased = tween.ease.apply(progress);
                scene.set(tween.sprite, tween.prop, from + (to - from) * eased);
                finished = false;
            }
        }

        finished
    }
}

impl AnimationEngine for TweenEngine {
    async fn play(&self, effect: &Effect) -> Result<(), AnimationError> {
        let started = Instant::now();
        let targets = self.anchor_targets(effect);
        let mut resolved: Vec<Option<(f32, f32)>> = vec![None; effect.tweens().len()];

        loop {
            let elapsed = started.elapsed().as_secs_f32();
            if self.step(effect, &targets, &mut resolved, elapsed) && elapsed >= effect.duration() {
                return Ok(());
            }
            tokio::time::sleep(self.frame).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::scene::{Prop, SpriteId};
    use crate::anim::stage::handle_spin;
    use crate::anim::tween::{Ease, Tween};
    use crate::settings::AnimationSettings;

    fn engine() -> TweenEngine {
        TweenEngine::new(Duration::from_millis(16))
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_reaches_targets() {
        let engine = engine();
        let effect = Effect::new("fade")
            .then(Tween::to(SpriteId::Handle, Prop::Alpha, 0.0, 0.3).ease(Ease::Power2InOut))
            .then(Tween::to(SpriteId::Door, Prop::X, 120.0, 0.5));

        let started = Instant::now();
        engine.play(&effect).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(800));
        let scene = engine.scene();
        let scene = scene.borrow();
        assert_eq!(scene.get(SpriteId::Handle, Prop::Alpha), 0.0);
        assert_eq!(scene.get(SpriteId::Door, Prop::X), 120.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_relative_rotation_accumulates() {
        let engine = engine();
        let turn = Effect::new("turn").then(Tween::by(SpriteId::Handle, Prop::Rotation, 1.0, 0.5));

        for _ in 0..7 {
            engine.play(&turn).await.unwrap();
        }
        let rotation = engine.scene().borrow().get(SpriteId::Handle, Prop::Rotation);
        // Accumulated past 2π, never wrapped
        assert!((rotation - 7.0).abs() < 1e-4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_duration_completes_immediately() {
        let engine = engine();
        let effect = Effect::new("snap").then(Tween::to(SpriteId::Glitter, Prop::Alpha, 1.0, 0.0));

        let started = Instant::now();
        engine.play(&effect).await.unwrap();
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(engine.scene().borrow().get(SpriteId::Glitter, Prop::Alpha), 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hold_is_waited_out() {
        let engine = engine();
        let effect = Effect::new("hold")
            .then(Tween::to(SpriteId::Glitter, Prop::Alpha, 1.0, 0.0))
            .hold(1.0);

        let started = Instant::now();
        engine.play(&effect).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spin_resyncs_shadow_with_handle() {
        let engine = engine();
        let settings = AnimationSettings::default();
        let scene = engine.scene();
        // Shadow left behind by an interrupted turn
        scene.borrow_mut().set(SpriteId::Handle, Prop::Rotation, 2.0);
        scene.borrow_mut().set(SpriteId::HandleShadow, Prop::Rotation, 1.3);

        engine.play(&handle_spin("spin", &settings)).await.unwrap();

        let scene = scene.borrow();
        let handle = scene.get(SpriteId::Handle, Prop::Rotation);
        let shadow = scene.get(SpriteId::HandleShadow, Prop::Rotation);
        assert!((handle - (2.0 + settings.spin_angle())).abs() < 1e-4);
        assert!((shadow - handle).abs() < 1e-4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_midway_value_is_interpolated() {
        let engine = engine();
        let effect = Effect::new("slide").then(Tween::to(SpriteId::Door, Prop::X, 100.0, 1.0));
        let scene = engine.scene();

        let play = engine.play(&effect);
        tokio::pin!(play);
        tokio::select! {
            _ = &mut play => panic!("finished too early"),
            _ = tokio::time::sleep(Duration::from_millis(500)) => {}
        }
        let x = scene.borrow().get(SpriteId::Door, Prop::X);
        assert!(x > 20.0 && x < 80.0, "x = {}", x);

        play.await.unwrap();
        assert_eq!(scene.borrow().get(SpriteId::Door, Prop::X), 100.0);
    }
}
