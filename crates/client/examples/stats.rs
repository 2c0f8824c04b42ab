//! Print searcher reputation from both stats endpoints.
//!
//! ```sh
//! SIGNER_PRIVATE_KEY=0x... BLOCK_NUMBER=17000000 cargo run --example stats
//! ```

use fbrpc_client::{config::load_u64_opt, types::UserStatsArgs, RelayClient, RelayConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let client = RelayClient::new(RelayConfig::from_env()?)?;
    let block = load_u64_opt("BLOCK_NUMBER")?.ok_or_else(|| eyre::eyre!("BLOCK_NUMBER not set"))?;

    let v1 = client.user_stats(UserStatsArgs::new(block)).await?;
    let v2 = client.user_stats_v2(UserStatsArgs::new(block)).await?;

    println!("searcher:            {}", client.address());
    println!("high priority:       {}", v2.is_high_priority);
    println!("gas simulated (7d):  {}", v2.last_7d_gas_simulated);
    println!("validator pay (7d):  {}", v2.last_7d_validator_payments);
    println!("miner pay (7d, v1):  {}", v1.last_7d_miner_payments);
    Ok(())
}
