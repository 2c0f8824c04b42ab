//! Test utilities for relay clients: deterministic signers and an in-process
//! mock relay that verifies request signatures.

#![warn(missing_debug_implementations, missing_docs, unreachable_pub, rustdoc::all)]
#![deny(unused_must_use, rust_2018_idioms)]

mod relay;
pub use relay::{MockRelay, MockReply, RelayRequest};

pub use axum::http::StatusCode;

/// Deterministic test keys, signers and addresses.
pub mod users;
pub use users::{TEST_KEYS, TEST_SIGNERS, TEST_USERS};

use tracing_subscriber::EnvFilter;

/// Install a test-friendly tracing subscriber, filtered by `RUST_LOG`.
///
/// Safe to call from every test. Only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
