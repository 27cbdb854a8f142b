//! digitpad
//!
//! A headless "draw a digit" pad: pointer events paint freehand strokes onto
//! a 280x280 raster, and a Predict action sends the raster as a PNG data URL
//! to a remote endpoint that answers with the recognized digit.
//!
//! # Features
//!
//! - **remote** (default): blocking HTTP predictor built on `reqwest`
//! - Stroke capture is immediate-mode: there is no stroke log, only pixels
//! - Submissions run off-thread; the last one to complete wins
//!
//! # Example
//!
//! ```no_run
//! use digitpad::{DigitPad, PadConfig, PointerEvent};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PadConfig {
//!     endpoint: "http://127.0.0.1:8000/predict".to_string(),
//!     ..Default::default()
//! };
//!
//! let mut pad = DigitPad::from_config(config)?;
//! pad.handle_pointer(PointerEvent::Down { x: 140.0, y: 40.0 });
//! pad.handle_pointer(PointerEvent::Move { x: 140.0, y: 240.0 });
//! pad.handle_pointer(PointerEvent::Up);
//!
//! let outcome = pad.submit_blocking();
//! println!("{:?}", outcome.display_line());
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

pub mod error;
pub use error::{Error, Result};

pub mod canvas;
pub mod input;
pub mod outcome;
pub mod pad;
pub mod predict;
pub mod submission;

pub use canvas::{Canvas, ImagePayload, StrokeState};
pub use input::{Action, PointerEvent, Step};
pub use outcome::{Outcome, FAILURE_MESSAGE};
pub use pad::DigitPad;
pub use predict::Predictor;
#[cfg(feature = "remote")]
pub use predict::HttpPredictor;
pub use submission::Ticket;

/// Address of a prediction backend running locally
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/predict";

/// Configuration for talking to the prediction endpoint
///
/// The endpoint is deliberately a setting rather than a constant; the default
/// points at a backend on the local machine.
///
/// # Examples
///
/// ```
/// let cfg = digitpad::PadConfig::default();
/// assert!(cfg.endpoint.ends_with("/predict"));
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct PadConfig {
    /// URL the image is POSTed to
    pub endpoint: String,
    /// User agent string to send with requests
    pub user_agent: String,
    /// Extra HTTP headers
    pub headers: HashMap<String, String>,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: format!("digitpad/{}", env!("CARGO_PKG_VERSION")),
            headers: HashMap::new(),
        }
    }
}

impl PadConfig {
    /// Check that the endpoint is an absolute http(s) URL
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.endpoint)
            .map_err(|e| Error::ConfigError(format!("endpoint {:?}: {}", self.endpoint, e)))?;
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(Error::ConfigError(format!(
                    "endpoint scheme must be http or https, got {}",
                    other
                )))
            }
        }
        if url.host_str().is_none() {
            return Err(Error::ConfigError(format!(
                "endpoint {:?} has no host",
                self.endpoint
            )));
        }
        Ok(())
    }

    /// Add a header from `Name: value` (or `Name:value`) form
    pub fn push_header(&mut self, raw: &str) -> Result<()> {
        let (name, value) = raw
            .split_once(':')
            .ok_or_else(|| Error::ConfigError(format!("header {:?} is not NAME:VALUE", raw)))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::ConfigError(format!("header {:?} has an empty name", raw)));
        }
        self.headers.insert(name.to_string(), value.trim().to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PadConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.user_agent.starts_with("digitpad/"));
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_validate_endpoint() {
        let ok = PadConfig {
            endpoint: "https://example.com/api/predict".into(),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        for bad in ["", "predict", "ftp://example.com/predict", "file:///tmp/x"] {
            let cfg = PadConfig {
                endpoint: bad.into(),
                ..Default::default()
            };
            assert!(
                matches!(cfg.validate(), Err(Error::ConfigError(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_push_header() {
        let mut cfg = PadConfig::default();
        cfg.push_header("Authorization: Bearer t").unwrap();
        cfg.push_header("X-Trace:1").unwrap();
        assert_eq!(cfg.headers["Authorization"], "Bearer t");
        assert_eq!(cfg.headers["X-Trace"], "1");
        assert!(cfg.push_header("novalue").is_err());
        assert!(cfg.push_header(": x").is_err());
    }
}
