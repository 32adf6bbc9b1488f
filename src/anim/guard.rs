//! Per-actor re-entrancy guards
//!
//! Each actor is either `Idle` or `Running`. Acquiring hands out a token
//! that flips the actor back to `Idle` when dropped, whichever way the
//! stage ends.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Independently animatable visual entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Actor {
    Handle,
    Door,
    Reward,
}

impl Actor {
    pub const ALL: [Actor; 3] = [Actor::Handle, Actor::Door, Actor::Reward];

    pub fn as_str(&self) -> &'static str {
        match self {
            Actor::Handle => "handle",
            Actor::Door => "door",
            Actor::Reward => "reward",
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActorState {
    #[default]
    Idle,
    Running,
}

/// Busy flag for one actor
#[derive(Debug, Clone, Default)]
pub struct ActorGuard {
    state: Rc<Cell<ActorState>>,
}

impl ActorGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ActorState {
        self.state.get()
    }

    pub fn is_busy(&self) -> bool {
        self.state() == ActorState::Running
    }

    /// Move to `Running`, or `None` if already running
    pub fn try_acquire(&self) -> Option<GuardToken> {
        if self.is_busy() {
            return None;
        }
        self.state.set(ActorState::Running);
        Some(GuardToken {
            state: Rc::clone(&self.state),
        })
    }
}

/// Held while an actor animates; releases on drop
#[derive(Debug)]
#[must_use = "the actor is released as soon as the token is dropped"]
pub struct GuardToken {
    state: Rc<Cell<ActorState>>,
}

impl Drop for GuardToken {
    fn drop(&mut self) {
        self.state.set(ActorState::Idle);
    }
}

/// One guard per actor
#[derive(Debug, Clone, Default)]
pub struct Guards {
    handle: ActorGuard,
    door: ActorGuard,
    reward: ActorGuard,
}

impl Guards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, actor: Actor) -> &ActorGuard {
        match actor {
            Actor::Handle => &self.handle,
            Actor::Door => &self.door,
            Actor::Reward => &self.reward,
        }
    }

    pub fn any_busy(&self) -> bool {
        Actor::ALL.iter().any(|&a| self.get(a).is_busy())
    }
}
