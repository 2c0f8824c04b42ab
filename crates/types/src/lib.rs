//! Relay RPC types.
//!
//! Contains the JSON-RPC [`Request`] and [`Response`] envelopes spoken by
//! Flashbots-compatible bundle relays, the [`RelayMethod`] names, and the
//! argument and result records for each relay method.
//!
//! These types carry no network or crypto logic. Signing and transport live
//! in `fbrpc-client`.

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

mod bundle;
pub use bundle::{
    CallBundleArgs, CallBundleResponse, SendBundleArgs, SendBundleResponse, TxSimulationResult,
};

mod envelope;
pub use envelope::{ErrorPayload, Id, Request, Response, ResponseError, Version, JSONRPC_VERSION};

mod method;
pub use method::RelayMethod;

mod private_tx;
pub use private_tx::{
    CancelPrivateTxArgs, CancelPrivateTxResponse, PrivateTxPreferences, SendPrivateTxArgs,
    SendPrivateTxResponse,
};

mod stats;
pub use stats::{
    BuilderTimestamp, BundleStats, BundleStatsArgs, BundleStatsV2, UserStats, UserStatsArgs,
    UserStatsV2,
};
