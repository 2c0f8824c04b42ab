use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The relay methods understood by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelayMethod {
    /// Simulate a bundle against a given block.
    #[serde(rename = "eth_callBundle")]
    CallBundle,
    /// Submit a bundle for inclusion.
    #[serde(rename = "eth_sendBundle")]
    SendBundle,
    /// Fetch statistics for the signing searcher.
    #[serde(rename = "flashbots_getUserStats")]
    UserStats,
    /// Fetch statistics for a submitted bundle.
    #[serde(rename = "flashbots_getBundleStats")]
    BundleStats,
    /// Fetch statistics for the signing searcher, V2 schema.
    #[serde(rename = "flashbots_getUserStatsV2")]
    UserStatsV2,
    /// Fetch statistics for a submitted bundle, V2 schema.
    #[serde(rename = "flashbots_getBundleStatsV2")]
    BundleStatsV2,
    /// Submit a single private transaction.
    #[serde(rename = "eth_sendPrivateTransaction")]
    SendPrivateTransaction,
    /// Cancel a previously submitted private transaction.
    #[serde(rename = "eth_cancelPrivateTransaction")]
    CancelPrivateTransaction,
}

impl RelayMethod {
    /// All known methods.
    pub const ALL: [Self; 8] = [
        Self::CallBundle,
        Self::SendBundle,
        Self::UserStats,
        Self::BundleStats,
        Self::UserStatsV2,
        Self::BundleStatsV2,
        Self::SendPrivateTransaction,
        Self::CancelPrivateTransaction,
    ];

    /// The wire name of the method.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CallBundle => "eth_callBundle",
            Self::SendBundle => "eth_sendBundle",
            Self::UserStats => "flashbots_getUserStats",
            Self::BundleStats => "flashbots_getBundleStats",
            Self::UserStatsV2 => "flashbots_getUserStatsV2",
            Self::BundleStatsV2 => "flashbots_getBundleStatsV2",
            Self::SendPrivateTransaction => "eth_sendPrivateTransaction",
            Self::CancelPrivateTransaction => "eth_cancelPrivateTransaction",
        }
    }
}

impl fmt::Display for RelayMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelayMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| format!("unknown relay method: {s}"))
    }
}

impl From<RelayMethod> for std::borrow::Cow<'static, str> {
    fn from(method: RelayMethod) -> Self {
        Self::Borrowed(method.as_str())
    }
}
