//! Read-only pointer snapshot consumed once per frame.

use serde::{Deserialize, Serialize};

use crate::primitives::Point;

/// Modifier key state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool, // Command on macOS, Windows key on Windows
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };
}

/// Pointer state for the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerSnapshot {
    /// `None` when the pointer is outside the window.
    pub position: Option<Point>,
    /// Primary button held this frame.
    pub down: bool,
    /// Primary button released this frame after a press.
    pub clicked: bool,
    pub double_clicked: bool,
    pub modifiers: Modifiers,
    /// Seconds since the previous frame.
    pub delta_time: f32,
}

impl PointerSnapshot {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Some(Point::new(x, y)),
            ..Self::default()
        }
    }

    pub fn pressed(mut self) -> Self {
        self.down = true;
        self
    }

    pub fn released(mut self) -> Self {
        self.down = false;
        self.clicked = true;
        self
    }
}
