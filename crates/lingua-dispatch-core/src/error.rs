use thiserror::Error;

/// Unified error type for lingua-dispatch-core
///
/// Every failure the dispatch pipeline can produce falls in one of five classes:
/// - invalid input from the caller
/// - missing or broken process configuration
/// - a model identifier no provider serves
/// - a failed call to a remote provider
/// - a failed read or write against the translation store
#[derive(Error, Debug)]
pub enum Error {
    /// A required request field was missing or blank
    #[error("missing required field: {field}")]
    Validation { field: &'static str },

    /// No usable provider credential, or an unreadable config file
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The model identifier does not map to any known adapter
    #[error("unsupported model: {0}")]
    UnsupportedModel(String),

    /// The remote provider call failed
    #[error("{provider} request failed: {kind}")]
    Provider {
        provider: &'static str,
        kind: ProviderFailure,
    },

    /// The translation store could not be opened, read or written
    #[error("storage error: {0}")]
    Storage(String),
}

/// What went wrong while talking to a provider.
#[derive(Error, Debug)]
pub enum ProviderFailure {
    /// Transport-level failure (DNS, connection reset, TLS)
    #[error("{0}")]
    Request(String),

    /// The provider answered with a non-success status
    #[error("HTTP {status}")]
    Status {
        status: u16,
        /// Upstream error payload, relayed to the caller as-is
        body: serde_json::Value,
    },

    /// The provider answered 2xx but the payload had no usable text
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The call exceeded the configured per-request timeout
    #[error("timed out")]
    Timeout,

    /// The selected provider family has no credential configured
    #[error("no API key configured")]
    MissingCredential,

    /// Masked failure; details are only logged
    #[error("translation failed, please try again later")]
    Unavailable,
}

impl Error {
    pub(crate) const fn provider(provider: &'static str, kind: ProviderFailure) -> Self {
        Self::Provider { provider, kind }
    }

    /// Map a `reqwest` transport error, keeping timeouts distinct.
    pub(crate) fn from_reqwest(provider: &'static str, err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ProviderFailure::Timeout
        } else if err.is_decode() {
            ProviderFailure::InvalidResponse(err.to_string())
        } else {
            ProviderFailure::Request(err.to_string())
        };
        Self::provider(provider, kind)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
