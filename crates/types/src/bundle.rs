//! Bundle simulation and submission types.
use alloy::{
    eips::BlockNumberOrTag,
    primitives::{Address, Bytes, B256, U64},
};
use serde::{Deserialize, Serialize};

/// Arguments for `eth_callBundle`.
///
/// See the [Flashbots docs] for the relay-side semantics.
///
/// [Flashbots docs]: https://docs.flashbots.net/flashbots-auction/advanced/rpc-endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallBundleArgs {
    /// Signed, EIP-2718 encoded transactions to execute atomically.
    pub txs: Vec<Bytes>,
    /// The block number for which this bundle is valid.
    pub block_number: U64,
    /// The block whose state the simulation is based on.
    pub state_block_number: BlockNumberOrTag,
    /// Timestamp to use for the simulation, in seconds since the unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

impl CallBundleArgs {
    /// Creates a new bundle with the given raw transactions, simulated on top
    /// of the latest state.
    pub fn from_raw_txs<I, T>(txs: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Bytes>,
    {
        Self { txs: txs.into_iter().map(Into::into).collect(), ..Default::default() }
    }

    /// Returns the transactions in this bundle.
    pub fn txs(&self) -> &[Bytes] {
        &self.txs
    }

    /// Returns the block number for this bundle.
    pub fn block_number(&self) -> u64 {
        self.block_number.to()
    }

    /// Adds a raw transaction to the bundle.
    pub fn append_raw_tx(mut self, tx: impl Into<Bytes>) -> Self {
        self.txs.push(tx.into());
        self
    }

    /// Sets the block number for the bundle.
    pub fn with_block_number(mut self, block_number: u64) -> Self {
        self.block_number = U64::from(block_number);
        self
    }

    /// Sets the state block number for the bundle.
    pub fn with_state_block_number(
        mut self,
        state_block_number: impl Into<BlockNumberOrTag>,
    ) -> Self {
        self.state_block_number = state_block_number.into();
        self
    }

    /// Sets the timestamp for the bundle.
    pub const fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Simulation result of a single transaction within a bundle.
///
/// Monetary amounts are kept as the decimal strings the relay sends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxSimulationResult {
    /// Hash of the simulated transaction.
    pub tx_hash: B256,
    /// Gas used by the transaction.
    pub gas_used: u64,
    /// Effective gas price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
    /// Gas fees paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_fees: Option<String>,
    /// Sender of the transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_address: Option<Address>,
    /// Recipient of the transaction. Absent for contract creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_address: Option<Address>,
    /// Change in coinbase balance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coinbase_diff: Option<String>,
    /// ETH transferred directly to the coinbase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eth_sent_to_coinbase: Option<String>,
    /// Execution error, if the transaction failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Revert reason, if the transaction reverted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revert: Option<String>,
    /// Return data of the call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl TxSimulationResult {
    /// True if the transaction neither errored nor reverted.
    pub const fn is_success(&self) -> bool {
        self.error.is_none() && self.revert.is_none()
    }
}

/// Response for `eth_callBundle`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallBundleResponse {
    /// The bundle hash.
    pub bundle_hash: B256,
    /// Effective gas price of the bundle.
    pub bundle_gas_price: String,
    /// Change in coinbase balance across the bundle.
    pub coinbase_diff: String,
    /// ETH transferred directly to the coinbase across the bundle.
    pub eth_sent_to_coinbase: String,
    /// Total gas fees paid by the bundle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_fees: Option<String>,
    /// Per-transaction simulation results, in bundle order.
    pub results: Vec<TxSimulationResult>,
    /// The block whose state was used for the simulation.
    pub state_block_number: u64,
    /// Total gas used by the bundle.
    pub total_gas_used: u64,
}

impl CallBundleResponse {
    /// True if every transaction in the bundle succeeded.
    pub fn is_success(&self) -> bool {
        self.results.iter().all(TxSimulationResult::is_success)
    }

    /// Iterate over the transactions that errored or reverted.
    pub fn failures(&self) -> impl Iterator<Item = &TxSimulationResult> + '_ {
        self.results.iter().filter(|result| !result.is_success())
    }
}

/// Arguments for `eth_sendBundle`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendBundleArgs {
    /// Signed, EIP-2718 encoded transactions to execute atomically.
    pub txs: Vec<Bytes>,
    /// The block number for which this bundle is valid.
    pub block_number: U64,
    /// Minimum timestamp for which this bundle is valid, in seconds since the
    /// unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_timestamp: Option<u64>,
    /// Maximum timestamp for which this bundle is valid, in seconds since the
    /// unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_timestamp: Option<u64>,
    /// Hashes of transactions that are allowed to revert.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reverting_tx_hashes: Vec<B256>,
}

impl SendBundleArgs {
    /// Creates a new bundle with the given raw transactions, targeting
    /// `block_number`.
    pub fn new<I, T>(txs: I, block_number: u64) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Bytes>,
    {
        Self {
            txs: txs.into_iter().map(Into::into).collect(),
            block_number: U64::from(block_number),
            ..Default::default()
        }
    }

    /// Sets the validity window of the bundle.
    pub const fn with_timestamps(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.min_timestamp = min;
        self.max_timestamp = max;
        self
    }

    /// Marks a transaction hash as allowed to revert.
    pub fn allow_revert(mut self, tx_hash: B256) -> Self {
        self.reverting_tx_hashes.push(tx_hash);
        self
    }
}

/// Response for `eth_sendBundle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendBundleResponse {
    /// The bundle hash, used to query bundle stats.
    pub bundle_hash: B256,
}
