//! JSON-RPC 2.0 envelopes.
mod error;
pub use error::ErrorPayload;

mod id;
pub use id::Id;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use std::borrow::Cow;

/// The JSON-RPC protocol version string.
pub const JSONRPC_VERSION: &str = "2.0";

/// Marker for the `"jsonrpc": "2.0"` field. Always serializes to
/// [`JSONRPC_VERSION`], and refuses to deserialize anything else.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version;

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(JSONRPC_VERSION)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let version = String::deserialize(deserializer)?;
        if version != JSONRPC_VERSION {
            return Err(de::Error::invalid_value(de::Unexpected::Str(&version), &JSONRPC_VERSION));
        }
        Ok(Self)
    }
}

/// A JSON-RPC request envelope.
///
/// `params` holds already-serialized JSON. The relay convention is an array
/// containing exactly one object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Protocol version.
    pub jsonrpc: Version,
    /// Request id.
    pub id: Id,
    /// Method name.
    pub method: Cow<'static, str>,
    /// Serialized params.
    pub params: Box<RawValue>,
}

impl Request {
    /// Create a new request with a freshly generated id.
    pub fn new(method: impl Into<Cow<'static, str>>, params: Box<RawValue>) -> Self {
        Self { jsonrpc: Version, id: Id::random(), method: method.into(), params }
    }

    /// Serialize `params` and create a new request with a freshly generated
    /// id.
    pub fn from_params<P: Serialize + ?Sized>(
        method: impl Into<Cow<'static, str>>,
        params: &P,
    ) -> serde_json::Result<Self> {
        serde_json::value::to_raw_value(params).map(|params| Self::new(method, params))
    }

    /// Replace the request id.
    pub fn with_id(mut self, id: impl Into<Id>) -> Self {
        self.id = id.into();
        self
    }

    /// The request id.
    pub const fn id(&self) -> &Id {
        &self.id
    }

    /// The method name.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The serialized params.
    pub fn params(&self) -> &RawValue {
        &self.params
    }
}

/// Errors produced when classifying a [`Response`].
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    /// The relay returned a structured error.
    #[error(transparent)]
    Rpc(#[from] ErrorPayload),
    /// The response carried neither a result nor an error.
    #[error("response contained neither a result nor an error")]
    MissingResult,
}

/// A JSON-RPC response envelope.
///
/// The result is kept as raw JSON until the caller knows which type to
/// decode it into.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    /// Protocol version, if the relay sent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<Version>,
    /// The id echoed by the relay.
    #[serde(default)]
    pub id: Id,
    /// The raw result, if the call succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Box<RawValue>>,
    /// The error, if the call failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

impl Response {
    /// A successful response.
    pub fn success(id: impl Into<Id>, result: Box<RawValue>) -> Self {
        Self { jsonrpc: Some(Version), id: id.into(), result: Some(result), error: None }
    }

    /// A failed response.
    pub fn failure(id: impl Into<Id>, error: ErrorPayload) -> Self {
        Self { jsonrpc: Some(Version), id: id.into(), result: None, error: Some(error) }
    }

    /// True if the response carries an error.
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Classify the response.
    ///
    /// An `error` field takes precedence over any `result`. A response with
    /// neither is a protocol violation.
    pub fn into_result(self) -> Result<Box<RawValue>, ResponseError> {
        match (self.error, self.result) {
            (Some(error), _) => Err(error.into()),
            (None, Some(result)) => Ok(result),
            (None, None) => Err(ResponseError::MissingResult),
        }
    }
}
