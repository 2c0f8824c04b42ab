//! Private transaction types.
use alloy::primitives::{Bytes, B256, U64};
use serde::{Deserialize, Serialize};

/// Inclusion preferences for a private transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateTxPreferences {
    /// Kept for backwards compatibility with older relays.
    pub fast: bool,
}

/// Arguments for `eth_sendPrivateTransaction`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendPrivateTxArgs {
    /// The raw signed transaction.
    pub tx: Bytes,
    /// Highest block number in which the transaction should be included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_block_number: Option<U64>,
    /// Inclusion preferences.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<PrivateTxPreferences>,
}

impl SendPrivateTxArgs {
    /// Create new args for the given raw signed transaction.
    pub fn new(tx: impl Into<Bytes>) -> Self {
        Self { tx: tx.into(), ..Default::default() }
    }

    /// Sets the highest block the transaction may be included in.
    pub fn with_max_block_number(mut self, max_block_number: u64) -> Self {
        self.max_block_number = Some(U64::from(max_block_number));
        self
    }

    /// Sets the inclusion preferences.
    pub const fn with_preferences(mut self, preferences: PrivateTxPreferences) -> Self {
        self.preferences = Some(preferences);
        self
    }
}

/// Response for `eth_sendPrivateTransaction`.
///
/// The relay returns the transaction hash as a bare string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SendPrivateTxResponse {
    /// Hash of the submitted transaction.
    pub tx_hash: B256,
}

/// Arguments for `eth_cancelPrivateTransaction`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelPrivateTxArgs {
    /// Hash of the private transaction to cancel.
    pub tx_hash: B256,
}

impl CancelPrivateTxArgs {
    /// Create new args for the given transaction hash.
    pub const fn new(tx_hash: B256) -> Self {
        Self { tx_hash }
    }
}

/// Response for `eth_cancelPrivateTransaction`.
///
/// The relay returns a bare boolean. A missing result is never read as
/// `false`; it surfaces as an error instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CancelPrivateTxResponse {
    /// Whether the transaction was cancelled.
    pub is_cancelled: bool,
}
