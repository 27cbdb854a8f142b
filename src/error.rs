//! Error types for the digit pad

use thiserror::Error;

/// Result type alias for pad operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while exporting or submitting a drawing
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to set up the HTTP client
    #[error("Predictor initialization failed: {0}")]
    InitializationError(String),

    /// Failed to encode the raster
    #[error("Image encoding failed: {0}")]
    EncodeError(String),

    /// Transport-level failure talking to the endpoint
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Endpoint answered with a non-success status
    #[error("Endpoint returned status {0}")]
    StatusError(u16),

    /// Response body did not have the expected shape
    #[error("Malformed response: {0}")]
    ResponseError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Event script could not be parsed
    #[error("Invalid event script: {0}")]
    ScriptError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::EncodeError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ResponseError(err.to_string())
    }
}

#[cfg(feature = "remote")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Error::StatusError(status.as_u16()),
            None if err.is_decode() => Error::ResponseError(err.to_string()),
            None => Error::NetworkError(err.to_string()),
        }
    }
}
