use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::value::RawValue;
use std::fmt;

/// A structured JSON-RPC error returned by the relay.
///
/// Only ever constructed by decoding a relay response (or by test fixtures).
/// The relay reached a decision and rejected the request, as opposed to the
/// request never reaching the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// The error code.
    pub code: i64,
    /// The error message.
    #[serde(default)]
    pub message: String,
    /// Additional error data, if the relay sent any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Box<RawValue>>,
}

impl ErrorPayload {
    /// Create a new error payload without data.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), data: None }
    }

    /// Attach raw error data.
    pub fn with_data(mut self, data: Box<RawValue>) -> Self {
        self.data = Some(data);
        self
    }

    /// The error code.
    pub const fn code(&self) -> i64 {
        self.code
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The raw error data, if any.
    pub fn data(&self) -> Option<&RawValue> {
        self.data.as_deref()
    }

    /// Attempt to deserialize the error data as `T`. Returns `None` if the
    /// relay sent no data.
    pub fn try_data_as<T: DeserializeOwned>(&self) -> Option<serde_json::Result<T>> {
        self.data().map(|data| serde_json::from_str(data.get()))
    }
}

impl fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            return write!(f, "json-rpc error {}", self.code);
        }
        f.write_str(&self.message)
    }
}

impl std::error::Error for ErrorPayload {}
