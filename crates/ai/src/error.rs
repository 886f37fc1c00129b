//! AI error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("Missing API key for provider {0}")]
    MissingApiKey(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the provider.
    #[error("Provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    /// The model answered, but not in the expected shape.
    #[error("Invalid model response: {0}")]
    InvalidResponse(String),
}

impl AiError {
    pub fn provider(status: u16, message: impl Into<String>) -> Self {
        Self::Provider {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }
}

impl From<AiError> for coinfolio_core::Error {
    fn from(err: AiError) -> Self {
        coinfolio_core::Error::Insight(err.to_string())
    }
}
