//! Integer grid coordinates

use serde::{Deserialize, Serialize};

/// A cell coordinate on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Midpoint of two positions, rounded half away from zero
    pub fn midpoint(&self, other: &Position) -> Position {
        let mx = (self.x + other.x) as f32 / 2.0;
        let my = (self.y + other.y) as f32 / 2.0;
        Position::new(mx.round() as i32, my.round() as i32)
    }
}
