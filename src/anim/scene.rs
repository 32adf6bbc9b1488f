//! Visual state of the vault's sprites
//!
//! The scene only stores the animatable properties; drawing them is the
//! presentation layer's job.

use serde::{Deserialize, Serialize};

use crate::consts::DOOR_SWAP_SCALE;

/// Animatable sprites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteId {
    Handle,
    HandleShadow,
    /// Container holding the three door sprites; only its `x` moves
    Door,
    ClosedDoor,
    OpenDoor,
    OpenDoorShadow,
    Glitter,
}

impl SpriteId {
    pub const ALL: [SpriteId; 7] = [
        SpriteId::Handle,
        SpriteId::HandleShadow,
        SpriteId::Door,
        SpriteId::ClosedDoor,
        SpriteId::OpenDoor,
        SpriteId::OpenDoorShadow,
        SpriteId::Glitter,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Animatable property of a sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Prop {
    Alpha,
    Scale,
    /// Radians, accumulated (never wrapped)
    Rotation,
    X,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub alpha: f32,
    pub scale: f32,
    pub rotation: f32,
    pub x: f32,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            scale: 1.0,
            rotation: 0.0,
            x: 0.0,
        }
    }
}

impl Sprite {
    pub fn get(&self, prop: Prop) -> f32 {
        match prop {
            Prop::Alpha => self.alpha,
            Prop::Scale => self.scale,
            Prop::Rotation => self.rotation,
            Prop::X => self.x,
        }
    }

    pub fn set(&mut self, prop: Prop, value: f32) {
        match prop {
            Prop::Alpha => self.alpha = value,
            Prop::Scale => self.scale = value,
            Prop::Rotation => self.rotation = value,
            Prop::X => self.x = value,
        }
    }
}

/// All sprites in their current visual state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    sprites: [Sprite; 7],
}

impl Default for Scene {
    fn default() -> Self {
        let hidden = Sprite {
            alpha: 0.0,
            ..Sprite::default()
        };
        let mut sprites = [Sprite::default(); 7];
        sprites[SpriteId::OpenDoor.index()] = Sprite {
            scale: DOOR_SWAP_SCALE,
            ..hidden
        };
        sprites[SpriteId::OpenDoorShadow.index()] = hidden;
        sprites[SpriteId::Glitter.index()] = Sprite {
            alpha: 0.0,
            scale: 0.8,
            ..Sprite::default()
        };
        Self { sprites }
    }
}

impl Scene {
    /// Vault closed, handle at rest
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sprite(&self, id: SpriteId) -> &Sprite {
        &self.sprites[id.index()]
    }

    pub fn get(&self, id: SpriteId, prop: Prop) -> f32 {
        self.sprite(id).get(prop)
    }

    pub fn set(&mut self, id: SpriteId, prop: Prop, value: f32) {
        self.sprites[id.index()].set(prop, value);
    }

    /// Closed-door sprite fully visible
    pub fn door_closed(&self) -> bool {
        self.get(SpriteId::ClosedDoor, Prop::Alpha) >= 1.0
            && self.get(SpriteId::OpenDoor, Prop::Alpha) <= 0.0
    }
}
