//! iRail client error types.

use super::convert::ConvertError;

/// Errors from the iRail HTTP client.
///
/// The client only classifies; turning an error into a user-facing,
/// localized message is the card's job.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport-level failure: DNS, connection refused, timeout.
    /// No HTTP response was received, so there is no status code.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success HTTP status.
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not the JSON shape we expect.
    #[error("JSON decode error: {message}")]
    Decode { message: String },

    /// The JSON decoded but carried values we could not interpret.
    #[error("malformed payload: {0}")]
    Convert(#[from] ConvertError),
}

impl FetchError {
    /// The HTTP status code, if the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
