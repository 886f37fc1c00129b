//! Error types for the market data crate.

use thiserror::Error;

/// Errors that can occur while fetching prices.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider does not know the requested coin id.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The provider answered with a non-success status or an unusable body.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider returned a value that failed validation.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    pub fn provider(provider: &str, message: impl Into<String>) -> Self {
        Self::ProviderError {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// True when the failure is about the coin itself rather than the transport.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::SymbolNotFound(_) | Self::ValidationFailed { .. }
        )
    }
}
