//! Simulate a bundle, submit it if every transaction succeeds, and report
//! its stats.
//!
//! ```sh
//! SIGNER_PRIVATE_KEY=0x... TARGET_BLOCK=17000001 \
//!     cargo run --example bundle -- 0x02f8... 0x02f8...
//! ```

use alloy::primitives::Bytes;
use fbrpc_client::{
    config::load_u64_opt,
    types::{BundleStatsArgs, CallBundleArgs, SendBundleArgs},
    RelayClient, RelayConfig,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let txs = std::env::args().skip(1).map(|s| s.parse()).collect::<Result<Vec<Bytes>, _>>()?;
    eyre::ensure!(!txs.is_empty(), "pass one or more raw signed transactions");

    let target =
        load_u64_opt("TARGET_BLOCK")?.ok_or_else(|| eyre::eyre!("TARGET_BLOCK not set"))?;
    let client = RelayClient::new(RelayConfig::from_env()?)?;

    let sim = client
        .call_bundle(CallBundleArgs::from_raw_txs(txs.clone()).with_block_number(target))
        .await?;
    info!(bundle_hash = %sim.bundle_hash, gas = sim.total_gas_used, "Simulated bundle");

    if !sim.is_success() {
        for failed in sim.failures() {
            warn!(
                tx_hash = %failed.tx_hash,
                error = ?failed.error,
                revert = ?failed.revert,
                "Transaction failed"
            );
        }
        eyre::bail!("bundle does not simulate cleanly");
    }

    let sent = client.send_bundle(SendBundleArgs::new(txs, target)).await?;
    info!(bundle_hash = %sent.bundle_hash, target, "Submitted bundle");

    let stats = client.bundle_stats_v2(BundleStatsArgs::new(sent.bundle_hash, target)).await?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
