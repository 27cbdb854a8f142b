//! What the pad shows after a submission completes.

use log::{info, warn};

use crate::Result;

/// The one message every failed submission collapses into
pub const FAILURE_MESSAGE: &str = "Failed to fetch prediction";

/// Result of the last completed submission.
///
/// A prediction and an error can never be shown together: the states are
/// variants of one enum.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Empty,
    Prediction(u8),
    Error(String),
}

impl Outcome {
    /// Map a finished prediction attempt to display state. Failure details
    /// are logged and dropped.
    pub fn from_result(result: Result<u8>) -> Self {
        match result {
            Ok(digit) => {
                info!("predicted digit {}", digit);
                Outcome::Prediction(digit)
            }
            Err(e) => {
                warn!("prediction failed: {}", e);
                Outcome::Error(FAILURE_MESSAGE.to_string())
            }
        }
    }

    pub fn prediction(&self) -> Option<u8> {
        match self {
            Outcome::Prediction(d) => Some(*d),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Outcome::Empty)
    }

    /// The status line under the canvas, if any
    pub fn display_line(&self) -> Option<String> {
        match self {
            Outcome::Empty => None,
            Outcome::Prediction(d) => Some(format!("Predicted Digit: {}", d)),
            Outcome::Error(msg) => Some(msg.clone()),
        }
    }
}
