//! Signed JSON-RPC client for Flashbots-compatible bundle relays.
//!
//! The [`RelayClient`] exposes one operation per relay method. Every call
//! builds a JSON-RPC envelope, serializes it once, signs those exact bytes
//! with the searcher key, and sends them with an `X-Flashbots-Signature`
//! header through the [`HttpTransport`].
//!
//! ## Usage Example
//!
//! ```no_run
//! use fbrpc_client::{RelayClient, RelayConfig};
//! use fbrpc_types::UserStatsArgs;
//!
//! # async fn f() -> eyre::Result<()> {
//! let config = RelayConfig::from_env()?;
//! let client = RelayClient::new(config)?;
//!
//! let stats = client.user_stats(UserStatsArgs::new(17_000_000)).await?;
//! println!("high priority: {}", stats.is_high_priority);
//! # Ok(())
//! # }
//! ```

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    clippy::missing_const_for_fn,
    rustdoc::all
)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![deny(unused_must_use, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

/// The [`RelayClient`] orchestrator.
mod client;
pub use client::RelayClient;

/// Configuration and environment loading.
pub mod config;
pub use config::{RelayConfig, DEFAULT_RELAY_URL, DEFAULT_TIMEOUT};

mod error;
pub use error::{ConfigError, RelayError, Result, SigningError};

/// Request signing.
pub mod signer;
pub use signer::{PayloadSigner, SIGNATURE_HEADER};

mod transport;
pub use transport::HttpTransport;

pub use fbrpc_types as types;
pub use tokio_util::sync::CancellationToken;
