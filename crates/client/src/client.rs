use crate::{
    ConfigError, HttpTransport, PayloadSigner, RelayConfig, RelayError, Result, DEFAULT_TIMEOUT,
};
use alloy::{primitives::Address, signers::local::PrivateKeySigner};
use fbrpc_types::{
    BundleStats, BundleStatsArgs, BundleStatsV2, CallBundleArgs, CallBundleResponse,
    CancelPrivateTxArgs, CancelPrivateTxResponse, RelayMethod, Request, Response, SendBundleArgs,
    SendBundleResponse, SendPrivateTxArgs, SendPrivateTxResponse, UserStats, UserStatsArgs,
    UserStatsV2,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::value::RawValue;
use std::borrow::Cow;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// Client for a Flashbots-compatible bundle relay.
///
/// Each operation builds a JSON-RPC request, signs and sends it through the
/// [`HttpTransport`], and decodes either the typed result or the relay's
/// structured error. Nothing is retried.
///
/// Clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct RelayClient<S = PrivateKeySigner> {
    transport: HttpTransport<S>,
}

impl RelayClient {
    /// Build a client from a [`RelayConfig`].
    ///
    /// Fails fast if the URL or the signing key is invalid, so a constructed
    /// client can always sign.
    pub fn new(config: RelayConfig) -> std::result::Result<Self, ConfigError> {
        let signer = config.signer().inspect_err(|e| warn!(%e, "Invalid signing key."))?;
        HttpTransport::new(config.url(), signer, config.timeout()).map(Self::from_transport)
    }
}

impl<S> RelayClient<S> {
    /// Build a client for `url` that signs with `signer`, using the default
    /// timeout.
    pub fn with_signer(url: &str, signer: S) -> std::result::Result<Self, ConfigError> {
        HttpTransport::new(url, signer, DEFAULT_TIMEOUT).map(Self::from_transport)
    }

    /// Build a client around an existing transport.
    pub const fn from_transport(transport: HttpTransport<S>) -> Self {
        Self { transport }
    }

    /// Get the transport.
    pub const fn transport(&self) -> &HttpTransport<S> {
        &self.transport
    }
}

impl<S> RelayClient<S>
where
    S: PayloadSigner,
{
    /// The searcher address the relay will see.
    pub fn address(&self) -> Address {
        self.transport.signer().address()
    }

    async fn call_raw<P>(
        &self,
        method: impl Into<Cow<'static, str>>,
        params: &P,
        cancel: Option<&CancellationToken>,
    ) -> Result<Box<RawValue>>
    where
        P: Serialize + ?Sized,
    {
        let request = Request::from_params(method, params)
            .inspect_err(|e| warn!(%e, "Failed to serialize params."))
            .map_err(RelayError::Serialization)?;

        let body = match cancel {
            Some(cancel) => self.transport.send_with_cancel(&request, cancel).await?,
            None => self.transport.send(&request).await?,
        };

        let response: Response = serde_json::from_slice(&body)
            .inspect_err(|e| warn!(%e, "Failed to decode response from relay"))
            .map_err(RelayError::Decode)?;

        // Checked on every method, before the result is looked at.
        response
            .into_result()
            .inspect_err(|e| debug!(%e, method = %request.method(), "Relay rejected request"))
            .map_err(Into::into)
    }

    async fn call<P, R>(
        &self,
        method: RelayMethod,
        args: P,
        cancel: Option<&CancellationToken>,
    ) -> Result<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        // Relays expect `params` to be an array holding exactly one object.
        let raw = self.call_raw(method, &[args], cancel).await?;
        serde_json::from_str(raw.get())
            .inspect_err(|e| warn!(%e, %method, "Failed to decode result from relay"))
            .map_err(RelayError::Decode)
    }

    /// Send an arbitrary method to the relay, returning the raw result.
    ///
    /// `params` is sent as-is, so callers wrap it in an array themselves.
    #[instrument(skip_all, fields(method = %method))]
    pub async fn raw_request<P>(&self, method: &str, params: &P) -> Result<Box<RawValue>>
    where
        P: Serialize + ?Sized,
    {
        self.call_raw(method.to_owned(), params, None).await
    }

    /// Simulate a bundle with `eth_callBundle`.
    #[instrument(skip_all)]
    pub async fn call_bundle(&self, args: CallBundleArgs) -> Result<CallBundleResponse> {
        self.call(RelayMethod::CallBundle, args, None).await
    }

    /// Simulate a bundle with `eth_callBundle`, aborting if `cancel` fires.
    #[instrument(skip_all)]
    pub async fn call_bundle_with_cancel(
        &self,
        args: CallBundleArgs,
        cancel: &CancellationToken,
    ) -> Result<CallBundleResponse> {
        self.call(RelayMethod::CallBundle, args, Some(cancel)).await
    }

    /// Submit a bundle with `eth_sendBundle`.
    #[instrument(skip_all)]
    pub async fn send_bundle(&self, args: SendBundleArgs) -> Result<SendBundleResponse> {
        self.call(RelayMethod::SendBundle, args, None).await
    }

    /// Submit a bundle with `eth_sendBundle`, aborting if `cancel` fires.
    #[instrument(skip_all)]
    pub async fn send_bundle_with_cancel(
        &self,
        args: SendBundleArgs,
        cancel: &CancellationToken,
    ) -> Result<SendBundleResponse> {
        self.call(RelayMethod::SendBundle, args, Some(cancel)).await
    }

    /// Fetch searcher stats with `flashbots_getUserStats`.
    #[instrument(skip_all)]
    pub async fn user_stats(&self, args: UserStatsArgs) -> Result<UserStats> {
        self.call(RelayMethod::UserStats, args, None).await
    }

    /// Fetch searcher stats with `flashbots_getUserStats`, aborting if
    /// `cancel` fires.
    #[instrument(skip_all)]
    pub async fn user_stats_with_cancel(
        &self,
        args: UserStatsArgs,
        cancel: &CancellationToken,
    ) -> Result<UserStats> {
        self.call(RelayMethod::UserStats, args, Some(cancel)).await
    }

    /// Fetch searcher stats with `flashbots_getUserStatsV2`.
    #[instrument(skip_all)]
    pub async fn user_stats_v2(&self, args: UserStatsArgs) -> Result<UserStatsV2> {
        self.call(RelayMethod::UserStatsV2, args, None).await
    }

    /// Fetch searcher stats with `flashbots_getUserStatsV2`, aborting if
    /// `cancel` fires.
    #[instrument(skip_all)]
    pub async fn user_stats_v2_with_cancel(
        &self,
        args: UserStatsArgs,
        cancel: &CancellationToken,
    ) -> Result<UserStatsV2> {
        self.call(RelayMethod::UserStatsV2, args, Some(cancel)).await
    }

    /// Fetch bundle stats with `flashbots_getBundleStats`.
    #[instrument(skip_all)]
    pub async fn bundle_stats(&self, args: BundleStatsArgs) -> Result<BundleStats> {
        self.call(RelayMethod::BundleStats, args, None).await
    }

    /// Fetch bundle stats with `flashbots_getBundleStats`, aborting if
    /// `cancel` fires.
    #[instrument(skip_all)]
    pub async fn bundle_stats_with_cancel(
        &self,
        args: BundleStatsArgs,
        cancel: &CancellationToken,
    ) -> Result<BundleStats> {
        self.call(RelayMethod::BundleStats, args, Some(cancel)).await
    }

    /// Fetch bundle stats with `flashbots_getBundleStatsV2`.
    #[instrument(skip_all)]
    pub async fn bundle_stats_v2(&self, args: BundleStatsArgs) -> Result<BundleStatsV2> {
        self.call(RelayMethod::BundleStatsV2, args, None).await
    }

    /// Fetch bundle stats with `flashbots_getBundleStatsV2`, aborting if
    /// `cancel` fires.
    #[instrument(skip_all)]
    pub async fn bundle_stats_v2_with_cancel(
        &self,
        args: BundleStatsArgs,
        cancel: &CancellationToken,
    ) -> Result<BundleStatsV2> {
        self.call(RelayMethod::BundleStatsV2, args, Some(cancel)).await
    }

    /// Submit a private transaction with `eth_sendPrivateTransaction`.
    #[instrument(skip_all)]
    pub async fn send_private_transaction(
        &self,
        args: SendPrivateTxArgs,
    ) -> Result<SendPrivateTxResponse> {
        self.call(RelayMethod::SendPrivateTransaction, args, None).await
    }

    /// Submit a private transaction with `eth_sendPrivateTransaction`,
    /// aborting if `cancel` fires.
    #[instrument(skip_all)]
    pub async fn send_private_transaction_with_cancel(
        &self,
        args: SendPrivateTxArgs,
        cancel: &CancellationToken,
    ) -> Result<SendPrivateTxResponse> {
        self.call(RelayMethod::SendPrivateTransaction, args, Some(cancel)).await
    }

    /// Cancel a private transaction with `eth_cancelPrivateTransaction`.
    #[instrument(skip_all)]
    pub async fn cancel_private_transaction(
        &self,
        args: CancelPrivateTxArgs,
    ) -> Result<CancelPrivateTxResponse> {
        self.call(RelayMethod::CancelPrivateTransaction, args, None).await
    }

    /// Cancel a private transaction with `eth_cancelPrivateTransaction`,
    /// aborting if `cancel` fires.
    #[instrument(skip_all)]
    pub async fn cancel_private_transaction_with_cancel(
        &self,
        args: CancelPrivateTxArgs,
        cancel: &CancellationToken,
    ) -> Result<CancelPrivateTxResponse> {
        self.call(RelayMethod::CancelPrivateTransaction, args, Some(cancel)).await
    }
}
