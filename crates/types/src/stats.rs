//! Searcher and bundle statistics types.
use alloy::primitives::{B256, U64};
use serde::{Deserialize, Serialize};

/// Arguments for `flashbots_getUserStats` and `flashbots_getUserStatsV2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsArgs {
    /// A recent block number, used to prevent replay. Must be within 20
    /// blocks of the current chain tip.
    pub block_number: U64,
}

impl UserStatsArgs {
    /// Create new args for the given block number.
    pub fn new(block_number: u64) -> Self {
        Self { block_number: U64::from(block_number) }
    }
}

/// Arguments for `flashbots_getBundleStats` and `flashbots_getBundleStatsV2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleStatsArgs {
    /// The bundle hash returned by `eth_sendBundle`.
    pub bundle_hash: B256,
    /// The block number the bundle was targeting.
    pub block_number: U64,
}

impl BundleStatsArgs {
    /// Create new args for the given bundle hash and target block.
    pub fn new(bundle_hash: B256, block_number: u64) -> Self {
        Self { bundle_hash, block_number: U64::from(block_number) }
    }
}

/// Response for `flashbots_getUserStats`.
///
/// The V1 endpoint uses snake_case keys. Amounts are decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    /// Whether the searcher has high priority.
    pub is_high_priority: bool,
    /// Total gas simulated over all time.
    pub all_time_gas_simulated: String,
    /// Total miner payments over all time.
    pub all_time_miner_payments: String,
    /// Gas simulated over the last day.
    pub last_1d_gas_simulated: String,
    /// Miner payments over the last day.
    pub last_1d_miner_payments: String,
    /// Gas simulated over the last seven days.
    pub last_7d_gas_simulated: String,
    /// Miner payments over the last seven days.
    pub last_7d_miner_payments: String,
}

/// Response for `flashbots_getUserStatsV2`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatsV2 {
    /// Whether the searcher has high priority.
    #[serde(rename = "isHighPriority")]
    pub is_high_priority: bool,
    /// Total gas simulated over all time.
    #[serde(rename = "allTimeGasSimulated")]
    pub all_time_gas_simulated: String,
    /// Total validator payments over all time.
    #[serde(rename = "allTimeValidatorPayments")]
    pub all_time_validator_payments: String,
    /// Gas simulated over the last day.
    #[serde(rename = "last1dGasSimulated", alias = "last1DGasSimulated")]
    pub last_1d_gas_simulated: String,
    /// Validator payments over the last day.
    #[serde(rename = "last1dValidatorPayments", alias = "last1DValidatorPayments")]
    pub last_1d_validator_payments: String,
    /// Gas simulated over the last seven days.
    #[serde(rename = "last7dGasSimulated", alias = "last7DGasSimulated")]
    pub last_7d_gas_simulated: String,
    /// Validator payments over the last seven days.
    #[serde(rename = "last7dValidatorPayments", alias = "last7DValidatorPayments")]
    pub last_7d_validator_payments: String,
}

/// Response for `flashbots_getBundleStats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleStats {
    /// Whether the bundle was submitted with high priority.
    pub is_high_priority: bool,
    /// Whether the bundle was sent to miners.
    pub is_sent_to_miners: bool,
    /// Whether the bundle was simulated.
    pub is_simulated: bool,
    /// When the bundle was sent to miners, if it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_to_miners_at: Option<String>,
    /// When the bundle was simulated, if it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulated_at: Option<String>,
    /// When the bundle was submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
}

/// A builder pubkey and the time it acted on a bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderTimestamp {
    /// The builder's BLS pubkey.
    pub pubkey: String,
    /// When the builder acted on the bundle.
    pub timestamp: String,
}

/// Response for `flashbots_getBundleStatsV2`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleStatsV2 {
    /// Whether the bundle was submitted with high priority.
    pub is_high_priority: bool,
    /// When the bundle was simulated, if it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulated_at: Option<String>,
    /// When the relay received the bundle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_at: Option<String>,
    /// Builders that considered the bundle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub considered_by_builders_at: Option<Vec<BuilderTimestamp>>,
    /// Builders that sealed a block containing the bundle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sealed_by_builders_at: Option<Vec<BuilderTimestamp>>,
}

impl BundleStatsV2 {
    /// True if at least one builder sealed a block with this bundle.
    pub fn is_sealed(&self) -> bool {
        self.sealed_by_builders_at.as_ref().is_some_and(|sealed| !sealed.is_empty())
    }
}
