//! Sequencing of animation stages
//!
//! Stages in a sequence run strictly one after another. Each animated stage
//! holds its actor's guard for as long as it runs; a request against a busy
//! actor is dropped, not queued. Stage failures and stalls are logged and
//! the sequence moves on, since visuals are best effort and the game state
//! has already changed by the time they play.

use std::rc::Rc;

use tokio_util::sync::CancellationToken;

use super::engine::AnimationEngine;
use super::guard::{Actor, Guards};
use super::stage::{self, Stage};
use crate::error::AnimationError;
use crate::settings::{AnimationSettings, secs};
use crate::sim::Direction;

/// How a single stage ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Completed,
    /// Actor was busy; nothing played
    Dropped,
    /// Engine failed or stalled; the guard was still released
    Failed(AnimationError),
    /// Aborted by the cancellation token
    Cancelled,
}

/// How a whole sequence ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceOutcome {
    /// Every stage ran (or was dropped/failed) in order
    Finished,
    /// A stage was cancelled; later stages never started
    Cancelled,
}

/// Per-stage record of a sequence run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceReport {
    pub outcome: SequenceOutcome,
    pub stages: Vec<(&'static str, StageOutcome)>,
}

impl SequenceReport {
    pub fn is_cancelled(&self) -> bool {
        self.outcome == SequenceOutcome::Cancelled
    }

    /// Outcome of the named stage, if it was reached
    pub fn stage(&self, name: &str) -> Option<&StageOutcome> {
        self.stages.iter().find(|(n, _)| *n == name).map(|(_, o)| o)
    }
}

/// Plays stages on an engine under per-actor guards.
///
/// Cloning is cheap and clones share guards and engine, so a clone can be
/// moved into a detached future (for example a handle turn) while this
/// one keeps sequencing.
pub struct Orchestrator<E> {
    engine: Rc<E>,
    guards: Guards,
    settings: Rc<AnimationSettings>,
}

impl<E> Clone for Orchestrator<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Rc::clone(&self.engine),
            guards: self.guards.clone(),
            settings: Rc::clone(&self.settings),
        }
    }
}

impl<E: AnimationEngine> Orchestrator<E> {
    pub fn new(engine: E, settings: AnimationSettings) -> Self {
        Self::from_shared(Rc::new(engine), settings)
    }

    pub fn from_shared(engine: Rc<E>, settings: AnimationSettings) -> Self {
        Self {
            engine,
            guards: Guards::new(),
            settings: Rc::new(settings),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn settings(&self) -> &AnimationSettings {
        &self.settings
    }

    pub fn is_busy(&self, actor: Actor) -> bool {
        self.guards.get(actor).is_busy()
    }

    /// True while any actor is animating
    pub fn any_busy(&self) -> bool {
        self.guards.any_busy()
    }

    /// Turn the handle one increment for an accepted input.
    ///
    /// Runs on its own; callers do not need to wait for it before handling
    /// the next input.
    pub async fn turn_handle(&self, direction: Direction) -> StageOutcome {
        let stage = Stage::animate(Actor::Handle, stage::handle_turn(direction, &self.settings));
        self.run_stage(&stage, &CancellationToken::new()).await
    }

    /// Reward sequence: door open, glitter, dwell, door close, celebration spin
    pub async fn play_win(&self, cancel: &CancellationToken) -> SequenceReport {
        log::info!("Playing win sequence");
        self.run_sequence(&stage::win_stages(&self.settings), cancel)
            .await
    }

    /// Reset sequence: punishment spin
    pub async fn play_failure(&self, cancel: &CancellationToken) -> SequenceReport {
        log::info!("Playing failure sequence");
        self.run_sequence(&stage::failure_stages(&self.settings), cancel)
            .await
    }

    /// Run `stages` in order, each awaited before the next starts
    pub async fn run_sequence(
        &self,
        stages: &[Stage],
        cancel: &CancellationToken,
    ) -> SequenceReport {
        let mut report = SequenceReport {
            outcome: SequenceOutcome::Finished,
            stages: Vec::with_capacity(stages.len()),
        };

        for stage in stages {
            let outcome = self.run_stage(stage, cancel).await;
            let cancelled = outcome == StageOutcome::Cancelled;
            report.stages.push((stage.name(), outcome));
            if cancelled {
                log::info!("Sequence cancelled at stage `{}`", stage.name());
                report.outcome = SequenceOutcome::Cancelled;
                break;
            }
        }

        report
    }

    /// Run a single stage under its actor's guard
    pub async fn run_stage(&self, stage: &Stage, cancel: &CancellationToken) -> StageOutcome {
        if cancel.is_cancelled() {
            return StageOutcome::Cancelled;
        }

        match stage {
            Stage::Dwell { duration, .. } => {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => StageOutcome::Cancelled,
                    _ = tokio::time::sleep(*duration) => StageOutcome::Completed,
                }
            }
            Stage::Animate { actor, effect } => {
                let Some(_token) = self.guards.get(*actor).try_acquire() else {
                    log::debug!("Dropped `{}`: {} is busy", effect.name(), actor);
                    return StageOutcome::Dropped;
                };

                let limit = secs(effect.duration())
                    .saturating_add(self.settings.stage_timeout_duration());

                // `_token` is dropped on every path out of this block
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => StageOutcome::Cancelled,
                    played = tokio::time::timeout(limit, self.engine.play(effect)) => match played {
                        Ok(Ok(())) => StageOutcome::Completed,
                        Ok(Err(err)) => {
                            log::warn!("Stage `{}` failed: {}", effect.name(), err);
                            StageOutcome::Failed(err)
                        }
                        Err(_) => {
                            let err = AnimationError::Stalled { stage: effect.name() };
                            log::warn!("{}; releasing {}", err, actor);
                            StageOutcome::Failed(err)
                        }
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::time::Duration;

    use tokio::time::Instant;

    use crate::anim::engine::TweenEngine;
    use crate::anim::scene::{Prop, SpriteId};
    use crate::anim::tween::Effect;

    /// Records effect names and sleeps for each effect's duration
    #[derive(Default)]
    struct Recorder {
        log: RefCell<Vec<(&'static str, Instant)>>,
    }

    impl AnimationEngine for Recorder {
        async fn play(&self, effect: &Effect) -> Result<(), AnimationError> {
            self.log.borrow_mut().push((effect.name(), Instant::now()));
            tokio::time::sleep(Duration::from_secs_f32(effect.duration())).await;
            Ok(())
        }
    }

    /// Never signals completion
    struct Stalling;

    impl AnimationEngine for Stalling {
        async fn play(&self, _effect: &Effect) -> Result<(), AnimationError> {
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    /// Fails the first call, then succeeds
    #[derive(Default)]
    struct Flaky {
        calls: Cell<u32>,
    }

    impl AnimationEngine for Flaky {
        async fn play(&self, _effect: &Effect) -> Result<(), AnimationError> {
            let n = self.calls.get();
            self.calls.set(n + 1);
            if n == 0 {
                Err(AnimationError::Engine("texture missing".into()))
            } else {
                Ok(())
            }
        }
    }

    fn names(report: &SequenceReport) -> Vec<&'static str> {
        report.stages.iter().map(|(n, _)| *n).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_win_stages_run_in_order_without_overlap() {
        let orch = Orchestrator::new(Recorder::default(), AnimationSettings::default());
        let started = Instant::now();
        let report = orch.play_win(&CancellationToken::new()).await;

        assert_eq!(report.outcome, SequenceOutcome::Finished);
        assert!(report.stages.iter().all(|(_, o)| *o == StageOutcome::Completed));

        let log = orch.engine().log.borrow();
        let played: Vec<_> = log.iter().map(|(n, _)| *n).collect();
        assert_eq!(played, vec!["door-open", "glitter", "door-close", "celebration-spin"]);

        // door-open 0.8s, glitter 4.1s, dwell 5s
        let offsets: Vec<f32> = log
            .iter()
            .map(|(_, t)| t.duration_since(started).as_secs_f32())
            .collect();
        assert!(offsets[0] < 1e-3);
        assert!((offsets[1] - 0.8).abs() < 0.01);
        assert!((offsets[2] - 9.9).abs() < 0.01);
        assert!((offsets[3] - 10.7).abs() < 0.01);
        assert!(!orch.any_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_busy_actor_drops_duplicate_request() {
        let orch = Orchestrator::new(Recorder::default(), AnimationSettings::default());
        let turn = orch.turn_handle(Direction::Clockwise);
        let again = orch.turn_handle(Direction::Clockwise);

        let (first, second) = tokio::join!(turn, again);
        assert_eq!(first, StageOutcome::Completed);
        assert_eq!(second, StageOutcome::Dropped);
        assert_eq!(orch.engine().log.borrow().len(), 1);
        assert!(!orch.is_busy(Actor::Handle));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_spin_dropped_while_handle_turning() {
        let orch = Orchestrator::new(Recorder::default(), AnimationSettings::default());
        let cancel = CancellationToken::new();

        let (turn, report) = tokio::join!(orch.turn_handle(Direction::CounterClockwise), async {
            assert!(orch.is_busy(Actor::Handle));
            orch.play_failure(&cancel).await
        });

        assert_eq!(turn, StageOutcome::Completed);
        assert_eq!(report.stage("punishment-spin"), Some(&StageOutcome::Dropped));
        assert_eq!(report.outcome, SequenceOutcome::Finished);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_stage_releases_guard_and_continues() {
        let settings = AnimationSettings {
            stage_timeout: 2.0,
            ..AnimationSettings::default()
        };
        let orch = Orchestrator::new(Stalling, settings);
        let report = orch.play_win(&CancellationToken::new()).await;

        assert_eq!(names(&report).len(), 5);
        assert!(matches!(
            report.stage("door-open"),
            Some(StageOutcome::Failed(AnimationError::Stalled { stage: "door-open" }))
        ));
        assert_eq!(report.stage("win-dwell"), Some(&StageOutcome::Completed));
        assert!(!orch.any_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_engine_failure_releases_guard() {
        let orch = Orchestrator::new(Flaky::default(), AnimationSettings::default());
        let first = orch.turn_handle(Direction::Clockwise).await;
        assert!(matches!(first, StageOutcome::Failed(AnimationError::Engine(_))));
        assert!(!orch.is_busy(Actor::Handle));

        let second = orch.turn_handle(Direction::Clockwise).await;
        assert_eq!(second, StageOutcome::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_aborts_remaining_stages() {
        let orch = Orchestrator::new(Recorder::default(), AnimationSettings::default());
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();

        let (report, _) = tokio::join!(orch.play_win(&cancel), async move {
            // Inside the dwell
            tokio::time::sleep(Duration::from_secs(6)).await;
            trigger.cancel();
        });

        assert_eq!(report.outcome, SequenceOutcome::Cancelled);
        assert_eq!(names(&report), vec!["door-open", "glitter", "win-dwell"]);
        assert_eq!(report.stage("win-dwell"), Some(&StageOutcome::Cancelled));
        assert!(!orch.any_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_before_start_plays_nothing() {
        let orch = Orchestrator::new(Recorder::default(), AnimationSettings::default());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let report = orch.play_failure(&cancel).await;
        assert!(report.is_cancelled());
        assert!(orch.engine().log.borrow().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_handle_rotation_accumulates_across_turns() {
        let engine = TweenEngine::new(Duration::from_millis(16));
        let scene = engine.scene();
        let orch = Orchestrator::new(engine, AnimationSettings::default());

        for _ in 0..4 {
            orch.turn_handle(Direction::Clockwise).await;
        }
        orch.turn_handle(Direction::CounterClockwise).await;

        let rotation = scene.borrow().get(SpriteId::Handle, Prop::Rotation);
        assert!((rotation - std::f32::consts::PI).abs() < 1e-4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_win_leaves_door_closed_and_handle_visible() {
        let engine = TweenEngine::new(Duration::from_millis(16));
        let scene = engine.scene();
        let orch = Orchestrator::new(engine, AnimationSettings::default());

        orch.play_win(&CancellationToken::new()).await;

        let scene = scene.borrow();
        assert!(scene.door_closed());
        assert_eq!(scene.get(SpriteId::Door, Prop::X), 0.0);
        assert_eq!(scene.get(SpriteId::Handle, Prop::Alpha), 1.0);
        assert_eq!(scene.get(SpriteId::Glitter, Prop::Alpha), 0.0);
        let spun = scene.get(SpriteId::Handle, Prop::Rotation);
        assert!((spun - 4.0 * std::f32::consts::PI).abs() < 1e-4);
    }
}
