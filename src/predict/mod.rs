//! Prediction backends.
//!
//! A [`Predictor`] turns an exported canvas image into a digit label. The
//! HTTP backend (feature `remote`, on by default) talks to the JSON endpoint;
//! closures implement the trait too, which keeps tests and alternative
//! transports simple.

use serde::{Deserialize, Serialize};

use crate::canvas::ImagePayload;
use crate::{Error, Result};

#[cfg(feature = "remote")]
pub mod http;

#[cfg(feature = "remote")]
pub use http::HttpPredictor;

/// Core trait for prediction backends
pub trait Predictor: Send + Sync {
    /// Perform a single prediction attempt. No retries.
    fn predict(&self, image: &ImagePayload) -> Result<u8>;
}

impl<F> Predictor for F
where
    F: Fn(&ImagePayload) -> Result<u8> + Send + Sync,
{
    fn predict(&self, image: &ImagePayload) -> Result<u8> {
        self(image)
    }
}

/// Backend used when no transport is compiled in; every attempt fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unavailable;

impl Predictor for Unavailable {
    fn predict(&self, _image: &ImagePayload) -> Result<u8> {
        Err(Error::ConfigError(
            "no prediction backend available (build with the `remote` feature)".into(),
        ))
    }
}

/// JSON body sent to the endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    /// `data:image/png;base64,...`
    pub image: String,
}

impl PredictRequest {
    pub fn from_payload(image: &ImagePayload) -> Self {
        Self {
            image: image.to_data_url(),
        }
    }
}

/// JSON body expected back on success
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predicted_digit: i64,
}

impl PredictResponse {
    /// The label, if it is a decimal digit
    pub fn digit(&self) -> Result<u8> {
        match self.predicted_digit {
            d @ 0..=9 => Ok(d as u8),
            other => Err(Error::ResponseError(format!(
                "predicted_digit out of range: {}",
                other
            ))),
        }
    }
}

/// Parse a success body into a digit label
pub fn parse_response(body: &[u8]) -> Result<u8> {
    let resp: PredictResponse = serde_json::from_slice(body)?;
    resp.digit()
}
