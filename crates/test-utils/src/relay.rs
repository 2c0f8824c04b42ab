use alloy::primitives::Address;
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use fbrpc_client::signer::{verify_credential, SIGNATURE_HEADER};
use futures_util::{future, stream, StreamExt};
use serde_json::{json, Value};
use std::{
    convert::Infallible,
    net::{Ipv4Addr, SocketAddr},
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};
use tokio::{net::TcpListener, task::JoinHandle};
use tracing::{debug, warn};

/// A request as received by the [`MockRelay`].
#[derive(Debug, Clone)]
pub struct RelayRequest {
    /// The JSON-RPC method name.
    pub method: String,
    /// The request id, as sent.
    pub id: Value,
    /// The `params` member, as sent.
    pub params: Value,
    /// The exact body bytes.
    pub body: Bytes,
    /// The `X-Flashbots-Signature` header, if present.
    pub signature: Option<String>,
    /// The address recovered from the signature, if it verified against
    /// `body`.
    pub recovered: Option<Address>,
}

impl RelayRequest {
    /// The single argument object in `params`.
    pub fn arg(&self) -> Value {
        self.params.get(0).cloned().unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone)]
enum ReplyKind {
    Result(Value),
    Error { code: i64, message: String },
    Status(StatusCode, String),
    Raw(Value),
}

/// The reply a [`MockRelay`] sends for a request.
#[derive(Debug, Clone)]
pub struct MockReply {
    kind: ReplyKind,
    delay: Option<Duration>,
    stall: Option<Duration>,
}

impl MockReply {
    const fn new(kind: ReplyKind) -> Self {
        Self { kind, delay: None, stall: None }
    }

    /// Reply with a JSON-RPC result.
    pub const fn result(result: Value) -> Self {
        Self::new(ReplyKind::Result(result))
    }

    /// Reply with a JSON-RPC error object.
    pub fn error(code: i64, message: impl Into<String>) -> Self {
        Self::new(ReplyKind::Error { code, message: message.into() })
    }

    /// Reply with a bare HTTP status and body.
    pub fn status(status: StatusCode, body: impl Into<String>) -> Self {
        Self::new(ReplyKind::Status(status, body.into()))
    }

    /// Reply with an arbitrary JSON document, sent as-is.
    pub const fn raw(body: Value) -> Self {
        Self::new(ReplyKind::Raw(body))
    }

    /// Wait before replying.
    pub const fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Send the status line, headers and body, then hold the response open
    /// for `stall` before ending it.
    pub const fn stall_body(mut self, stall: Duration) -> Self {
        self.stall = Some(stall);
        self
    }

    fn into_response(self, id: Value) -> Response {
        let (status, body) = match self.kind {
            ReplyKind::Result(result) => (
                StatusCode::OK,
                json!({ "jsonrpc": "2.0", "id": id, "result": result }).to_string(),
            ),
            ReplyKind::Error { code, message } => (
                StatusCode::OK,
                json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": { "code": code, "message": message },
                })
                .to_string(),
            ),
            ReplyKind::Status(status, body) => (status, body),
            ReplyKind::Raw(body) => (StatusCode::OK, body.to_string()),
        };

        let body = match self.stall {
            Some(stall) => {
                let head = stream::once(future::ready(Ok::<_, Infallible>(Bytes::from(body))));
                let tail = stream::once(async move {
                    tokio::time::sleep(stall).await;
                    Ok(Bytes::new())
                });
                Body::from_stream(head.chain(tail))
            }
            None => Body::from(body),
        };

        let mut response = (status, body).into_response();
        if status.is_success() {
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        response
    }
}

type Responder = dyn Fn(&RelayRequest) -> MockReply + Send + Sync;

struct Inner {
    responder: Box<Responder>,
    requests: Mutex<Vec<RelayRequest>>,
}

/// An in-process relay that checks request signatures the way a
/// Flashbots-compatible relay does.
///
/// Requests whose `X-Flashbots-Signature` is missing or does not verify
/// against the exact body are rejected with `403`. Everything else is
/// recorded and answered by the responder. The server task is aborted when
/// the relay is dropped.
pub struct MockRelay {
    addr: SocketAddr,
    inner: Arc<Inner>,
    handle: JoinHandle<()>,
}

impl core::fmt::Debug for MockRelay {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MockRelay").field("addr", &self.addr).finish_non_exhaustive()
    }
}

impl Drop for MockRelay {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl MockRelay {
    /// Bind to an ephemeral local port and answer every request with
    /// `responder`.
    pub async fn spawn<F>(responder: F) -> std::io::Result<Self>
    where
        F: Fn(&RelayRequest) -> MockReply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;

        let inner =
            Arc::new(Inner { responder: Box::new(responder), requests: Mutex::new(Vec::new()) });
        let router = Router::new().route("/", post(handle)).with_state(inner.clone());

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                warn!(%e, "Mock relay stopped");
            }
        });
        debug!(%addr, "Mock relay listening");

        Ok(Self { addr, inner, handle })
    }

    /// Answer every request with the same result.
    pub async fn with_result(result: Value) -> std::io::Result<Self> {
        Self::spawn(move |_| MockReply::result(result.clone())).await
    }

    /// The URL to point a client at.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// All requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<RelayRequest> {
        self.inner.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<RelayRequest> {
        self.inner.requests.lock().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }
}

async fn handle(State(inner): State<Arc<Inner>>, headers: HeaderMap, body: Bytes) -> Response {
    let signature =
        headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()).map(ToOwned::to_owned);
    let recovered = signature.as_deref().and_then(|s| verify_credential(s, &body));

    let parsed: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let request = RelayRequest {
        method: parsed["method"].as_str().unwrap_or_default().to_owned(),
        id: parsed.get("id").cloned().unwrap_or(Value::Null),
        params: parsed.get("params").cloned().unwrap_or(Value::Null),
        body,
        signature,
        recovered,
    };
    let id = request.id.clone();

    inner.requests.lock().unwrap_or_else(PoisonError::into_inner).push(request.clone());

    if request.recovered.is_none() {
        warn!(method = %request.method, "Rejecting request with bad signature");
        return (StatusCode::FORBIDDEN, "invalid flashbots signature").into_response();
    }

    let reply = (inner.responder)(&request);
    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }
    reply.into_response(id)
}
