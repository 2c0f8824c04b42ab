use crate::{
    config::DEFAULT_TIMEOUT, signer::SIGNATURE_HEADER, ConfigError, PayloadSigner, RelayError,
    SigningError,
};
use fbrpc_types::Request;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// Sends signed JSON-RPC requests to a relay over HTTP.
///
/// The base header set is fixed at construction. Each request derives its own
/// header map from it and adds the signature, so concurrent requests never
/// observe each other's credentials.
#[derive(Debug, Clone)]
pub struct HttpTransport<S> {
    /// The URL of the relay.
    url: reqwest::Url,
    /// The reqwest client used to send requests. Owns the connection pool.
    client: reqwest::Client,
    /// Headers sent with every request.
    headers: HeaderMap,
    /// Signs each serialized payload.
    signer: S,
}

fn base_headers() -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(3);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

impl<S> HttpTransport<S> {
    /// Create a new transport with the given URL and client.
    pub fn new_with_client(url: reqwest::Url, client: reqwest::Client, signer: S) -> Self {
        Self { url, client, headers: base_headers(), signer }
    }

    /// Create a new transport for a string URL, with a fresh client bounded
    /// by `timeout`.
    pub fn new(url: &str, signer: S, timeout: Duration) -> Result<Self, ConfigError> {
        let url =
            reqwest::Url::parse(url).inspect_err(|e| warn!(%e, "Failed to parse relay URL."))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .inspect_err(|e| warn!(%e, "Failed to build http client."))
            .map_err(ConfigError::Client)?;
        Ok(Self::new_with_client(url, client, signer))
    }

    /// Create a new transport for a string URL with the default timeout.
    pub fn new_from_string(url: &str, signer: S) -> Result<Self, ConfigError> {
        Self::new(url, signer, DEFAULT_TIMEOUT)
    }

    /// Get the relay URL.
    pub const fn url(&self) -> &reqwest::Url {
        &self.url
    }

    /// Get the client used to send requests.
    pub const fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Get the signer.
    pub const fn signer(&self) -> &S {
        &self.signer
    }
}

impl<S> HttpTransport<S>
where
    S: PayloadSigner,
{
    /// Headers for a single request.
    fn signed_headers(&self, payload: &[u8]) -> Result<HeaderMap, SigningError> {
        let credential = self
            .signer
            .sign_payload(payload)
            .inspect_err(|e| warn!(%e, "Failed to sign payload."))?;

        let mut headers = self.headers.clone();
        headers.insert(
            HeaderName::from_static(SIGNATURE_HEADER),
            HeaderValue::from_str(&credential)?,
        );
        Ok(headers)
    }

    /// Serialize, sign, and send a request. Returns the body of a 2xx
    /// response.
    #[instrument(skip_all, fields(method = %request.method(), id = %request.id()))]
    pub async fn send(&self, request: &Request) -> Result<Vec<u8>, RelayError> {
        // Serialize once. These exact bytes are signed and sent.
        let payload = serde_json::to_vec(request)
            .inspect_err(|e| warn!(%e, "Failed to serialize request."))
            .map_err(RelayError::Serialization)?;

        let headers = self.signed_headers(&payload)?;

        debug!(bytes = payload.len(), "Sending request to relay");
        let response = self
            .client
            .post(self.url.clone())
            .headers(headers)
            .body(payload)
            .send()
            .await
            .inspect_err(|e| warn!(%e, "Failed to send request to relay"))?;

        let status = response.status();
        if !status.is_success() {
            // A failed read, including a timeout, wins over the status.
            let body = response
                .bytes()
                .await
                .inspect_err(|e| warn!(%e, %status, "Failed to read error body from relay"))?
                .to_vec();
            warn!(%status, "Relay returned error status");
            return Err(RelayError::Http { status, body });
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .inspect_err(|e| warn!(%e, "Failed to read response from relay"))
            .map_err(Into::into)
    }

    /// Send a request, aborting if `cancel` fires first.
    ///
    /// On cancellation the in-flight exchange is dropped, which releases its
    /// connection.
    pub async fn send_with_cancel(
        &self,
        request: &Request,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, RelayError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(method = %request.method(), "Relay request cancelled");
                Err(RelayError::Cancelled)
            }
            res = self.send(request) => res,
        }
    }
}
