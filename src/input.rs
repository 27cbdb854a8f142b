//! Pointer events, user actions and replayable event scripts.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Pointer input on the drawing surface, in surface-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
    /// Pointer left the surface bounds
    Leave,
}

/// The two buttons under the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Clear,
    Predict,
}

/// One entry of an event script:
/// `{"pointer": {"type": "down", "x": 10, "y": 10}}` or `{"action": "clear"}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Pointer(PointerEvent),
    Action(Action),
}

/// Parse a JSON array of steps
pub fn parse_script(json: &str) -> Result<Vec<Step>> {
    serde_json::from_str(json).map_err(|e| Error::ScriptError(e.to_string()))
}

/// Down at the first point, moves through the rest, then up
pub fn stroke(points: &[(f32, f32)]) -> Vec<Step> {
    let mut steps = Vec::with_capacity(points.len() + 1);
    for (i, &(x, y)) in points.iter().enumerate() {
        let ev = if i == 0 {
            PointerEvent::Down { x, y }
        } else {
            PointerEvent::Move { x, y }
        };
        steps.push(Step::Pointer(ev));
    }
    if !points.is_empty() {
        steps.push(Step::Pointer(PointerEvent::Up));
    }
    steps
}
