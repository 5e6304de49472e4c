//! Input model: joystick samples and the mode flags that gate polling.
//!
//! A joystick gesture arrives as a stream of [`InputSample`]s, `start`, then
//! any number of `move`, then `stop`. Samples are not periodic; they follow
//! the physical device. [`ModeFlags`] is the explicit state the poll loop
//! reads on every tick.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

/// Phase of a joystick gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureStatus {
    /// Stick grabbed.
    Start,
    /// Stick moved while held.
    #[serde(alias = "moving")]
    Move,
    /// Stick released.
    #[default]
    Stop,
}

/// One sample from the directional input device.
///
/// Extra device fields (coarse direction, deflection) are ignored on read.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InputSample {
    pub status: GestureStatus,
    /// Horizontal stick offset. Absent on release.
    #[serde(default)]
    pub x: Option<f64>,
    /// Vertical stick offset. Absent on release.
    #[serde(default)]
    pub y: Option<f64>,
}

impl InputSample {
    /// A `move` sample at `(x, y)`.
    #[must_use]
    pub fn moving(x: f64, y: f64) -> Self {
        Self { status: GestureStatus::Move, x: Some(x), y: Some(y) }
    }

    /// A `start` sample at `(x, y)`.
    #[must_use]
    pub fn start(x: f64, y: f64) -> Self {
        Self { status: GestureStatus::Start, x: Some(x), y: Some(y) }
    }

    /// A release sample.
    #[must_use]
    pub fn stop() -> Self {
        Self::default()
    }

    /// Stick offset, when both axes are present.
    #[must_use]
    pub fn offset(&self) -> Option<(f64, f64)> {
        Some((self.x?, self.y?))
    }
}

/// Feature toggles read by the poll loop each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeFlags {
    /// Expand a single selected node to everything reachable from it.
    pub linked_list: bool,
    /// Joystick rotation of a pivot's neighbors.
    pub joystick: bool,
    /// Sketchy stroke filter. Rendering only; the engine just carries it.
    pub crayon: bool,
}

impl Default for ModeFlags {
    fn default() -> Self {
        Self { linked_list: false, joystick: true, crayon: false }
    }
}
