use alloy::signers::local::LocalSignerError;
use fbrpc_types::{ErrorPayload, ResponseError};
use reqwest::{header::InvalidHeaderValue, StatusCode};

/// Result type for [`RelayClient`] operations.
///
/// [`RelayClient`]: crate::RelayClient
pub type Result<T> = std::result::Result<T, RelayError>;

/// Errors raised while building a client. These are fatal and never retried.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The relay URL could not be parsed.
    #[error("invalid relay url: {0}")]
    Url(#[from] url::ParseError),
    /// Missing or non-unicode environment variable.
    #[error("missing or non-unicode environment variable: {0}")]
    MissingVar(String),
    /// Error parsing an integer from the environment.
    #[error("failed to parse environment variable: {0}")]
    ParseInt(#[from] std::num::ParseIntError),
    /// No signing key was configured.
    #[error("no signing key configured")]
    MissingKey,
    /// The signing key is not a valid secp256k1 private key.
    #[error("invalid signing key: {0}")]
    InvalidKey(#[from] LocalSignerError),
    /// The underlying HTTP client could not be built.
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ConfigError {
    /// Missing or non-unicode env var.
    pub fn missing(s: &str) -> Self {
        Self::MissingVar(s.to_string())
    }
}

/// Errors raised while signing a request payload.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    /// The signer failed to produce a signature.
    #[error(transparent)]
    Signer(#[from] alloy::signers::Error),
    /// The credential could not be used as a header value.
    #[error("signature is not a valid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),
}

/// Errors returned by a single relay call.
///
/// Exactly one kind is returned per failed call. No partial results are ever
/// returned alongside an error, and no error is retried.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The arguments or the request envelope could not be serialized.
    #[error("failed to serialize request: {0}")]
    Serialization(#[source] serde_json::Error),
    /// The response envelope or its result had an unexpected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
    /// The response carried neither a result nor an error.
    #[error("response contained neither a result nor an error")]
    MissingResult,
    /// The request could not be signed.
    #[error(transparent)]
    Signing(#[from] SigningError),
    /// The request did not complete within the configured timeout.
    #[error("request to relay timed out")]
    Timeout,
    /// The caller cancelled the request.
    #[error("request to relay was cancelled")]
    Cancelled,
    /// The request never reached the relay, or the connection failed.
    #[error("error contacting relay: {0}")]
    Transport(#[source] reqwest::Error),
    /// The relay answered with a non-2xx status.
    ///
    /// The display shows the canonical reason phrase for `status`, not the
    /// phrase the relay sent on its status line.
    #[error("{}", format_http(.status, .body))]
    Http {
        /// The response status.
        status: StatusCode,
        /// The raw response body.
        body: Vec<u8>,
    },
    /// The relay rejected the request with a structured error.
    #[error("{}", format_rpc(.0))]
    Rpc(ErrorPayload),
}

/// `"<code> <canonical reason>[: <body>]"`. Unregistered codes render as
/// `"<code> <unknown status code>"`.
fn format_http(status: &StatusCode, body: &[u8]) -> String {
    if body.is_empty() {
        return status.to_string();
    }
    format!("{status}: {}", String::from_utf8_lossy(body))
}

fn format_rpc(err: &ErrorPayload) -> String {
    format!("relay returned error {}: {err}", err.code)
}

impl RelayError {
    /// True if the failure happened before the relay reached a decision.
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout | Self::Cancelled | Self::Transport(_) | Self::Http { .. })
    }

    /// True if the request timed out.
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// The structured relay error, if this is one.
    pub const fn as_rpc_error(&self) -> Option<&ErrorPayload> {
        match self {
            Self::Rpc(err) => Some(err),
            _ => None,
        }
    }

    /// The HTTP status, if the relay answered with a non-2xx status.
    pub const fn http_status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout;
        }
        Self::Transport(err)
    }
}

impl From<ResponseError> for RelayError {
    fn from(err: ResponseError) -> Self {
        match err {
            ResponseError::Rpc(payload) => Self::Rpc(payload),
            ResponseError::MissingResult => Self::MissingResult,
        }
    }
}
