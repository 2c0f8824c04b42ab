//! Send a private transaction, and optionally cancel it straight away.
//!
//! ```sh
//! SIGNER_PRIVATE_KEY=0x... cargo run --example private_tx -- 0x02f8... [--cancel]
//! ```

use alloy::primitives::Bytes;
use fbrpc_client::{
    types::{CancelPrivateTxArgs, PrivateTxPreferences, SendPrivateTxArgs},
    RelayClient, RelayConfig,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let mut args = std::env::args().skip(1);
    let tx: Bytes = args.next().ok_or_else(|| eyre::eyre!("missing raw transaction"))?.parse()?;
    let cancel = args.any(|a| a == "--cancel");

    let client = RelayClient::new(RelayConfig::from_env()?)?;

    let args = SendPrivateTxArgs::new(tx).with_preferences(PrivateTxPreferences { fast: true });
    let sent = client.send_private_transaction(args).await?;
    println!("sent {}", sent.tx_hash);

    if cancel {
        let args = CancelPrivateTxArgs::new(sent.tx_hash);
        let res = client.cancel_private_transaction(args).await?;
        println!("cancelled: {}", res.is_cancelled);
    }
    Ok(())
}
