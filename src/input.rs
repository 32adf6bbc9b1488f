//! Pointer input to dial direction
//!
//! A press left of the handle's center turns it counterclockwise, anything
//! else clockwise.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::Direction;

/// A pointer press together with the handle's on-screen center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub pointer: Vec2,
    pub anchor: Vec2,
}

impl PointerEvent {
    pub fn new(pointer: Vec2, anchor: Vec2) -> Self {
        Self { pointer, anchor }
    }

    pub fn direction(&self) -> Direction {
        direction_from_pointer(self.pointer, self.anchor)
    }
}

/// Compare only horizontal positions: strictly left is counterclockwise
#[inline]
pub fn direction_from_pointer(pointer: Vec2, anchor: Vec2) -> Direction {
    if pointer.x < anchor.x {
        Direction::CounterClockwise
    } else {
        Direction::Clockwise
    }
}

/// Parse a text command from the terminal front end.
///
/// Accepts `left`/`l`/`ccw`, `right`/`r`/`cw`, or `x <value>` for a press at
/// horizontal position `value` relative to an anchor at the origin.
pub fn parse_command(line: &str) -> Option<PointerEvent> {
    let mut parts = line.split_whitespace();
    let head = parts.next()?.to_lowercase();
    let pointer_x = match head.as_str() {
        "left" | "l" | "ccw" => -1.0,
        "right" | "r" | "cw" => 1.0,
        "x" => parts.next()?.parse::<f32>().ok()?,
        _ => return None,
    };
    Some(PointerEvent::new(Vec2::new(pointer_x, 0.0), Vec2::ZERO))
}
