//! Animation orchestration
//!
//! Effects are tween timelines over the vault's sprites. Stages wrap an
//! effect with the actor it animates, and the orchestrator runs stage lists
//! in order under per-actor guards. Everything here runs on one thread;
//! concurrency is interleaving at await points.

pub mod engine;
pub mod guard;
pub mod orchestrator;
pub mod scene;
pub mod stage;
pub mod tween;

pub use engine::{AnimationEngine, TweenEngine};
pub use guard::{Actor, ActorGuard, ActorState, GuardToken, Guards};
pub use orchestrator::{Orchestrator, SequenceOutcome, SequenceReport, StageOutcome};
pub use scene::{Prop, Scene, Sprite, SpriteId};
pub use stage::Stage;
pub use tween::{Ease, Effect, Target, Tween};
