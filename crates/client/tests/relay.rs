//! End-to-end tests against an in-process relay that verifies signatures.
//!
//! Every successful call here also proves the `X-Flashbots-Signature` header
//! verified against the exact body bytes, since the mock relay answers `403`
//! otherwise.

use alloy::{
    primitives::{b256, bytes, keccak256, Address, Bytes, B256},
    signers::local::PrivateKeySigner,
};
use fbrpc_client::{
    types::{
        BundleStatsArgs, CallBundleArgs, CancelPrivateTxArgs, PrivateTxPreferences,
        SendBundleArgs, SendPrivateTxArgs, UserStatsArgs,
    },
    CancellationToken, ConfigError, PayloadSigner, RelayClient, RelayConfig, RelayError,
    SigningError,
};
use fbrpc_test_utils::{
    init_tracing, MockRelay, MockReply, RelayRequest, StatusCode, TEST_KEYS, TEST_SIGNERS,
    TEST_USERS,
};
use futures_util::future::join_all;
use serde_json::{json, Value};
use std::{collections::HashSet, time::Duration};

const BUNDLE_HASH: B256 =
    b256!("0x45b1e9ce38a9a0a4b9c3a6b4e2d0ec4e1bd8a3d6f8e4a9a05f3a9a1f0c0d1e2f");
const TX_HASH: B256 = b256!("0x8d3c6e5a1f4b2a9e7c0d1f2e3a4b5c6d7e8f9a0b1c2d3e4f5a6b7c8d9e0f1a2b");

fn raw_tx() -> Bytes {
    bytes!("02f86c0180843b9aca00825208940000000000000000000000000000000000000001")
}

fn client(relay: &MockRelay) -> RelayClient {
    init_tracing();
    RelayClient::with_signer(&relay.url(), TEST_SIGNERS[0].clone()).unwrap()
}

fn only_request(relay: &MockRelay) -> RelayRequest {
    let mut requests = relay.requests();
    assert_eq!(requests.len(), 1);
    let req = requests.remove(0);
    assert_eq!(req.recovered, Some(TEST_USERS[0]));
    assert_eq!(req.params.as_array().map(Vec::len), Some(1));
    req
}

fn call_bundle_result() -> Value {
    json!({
        "bundleGasPrice": "476190476193",
        "bundleHash": BUNDLE_HASH,
        "coinbaseDiff": "20000000000126000",
        "ethSentToCoinbase": "20000000000000000",
        "gasFees": "126000",
        "results": [
            {
                "coinbaseDiff": "10000000000063000",
                "ethSentToCoinbase": "10000000000000000",
                "fromAddress": "0x02a727155aef8609c9f7f2179b2a1f560b39f5a0",
                "gasFees": "63000",
                "gasPrice": "476190476193",
                "gasUsed": 21000,
                "toAddress": "0x73625f59cadc5009cb458b751b3e7b6b48c06f2c",
                "txHash": TX_HASH,
                "value": "0x"
            },
            {
                "fromAddress": "0x02a727155aef8609c9f7f2179b2a1f560b39f5a0",
                "gasUsed": 30000,
                "txHash": "0x0000000000000000000000000000000000000000000000000000000000000002",
                "error": "execution reverted",
                "revert": "not enough balance"
            }
        ],
        "stateBlockNumber": 5221585,
        "totalGasUsed": 51000
    })
}

#[tokio::test]
async fn call_bundle() {
    let relay = MockRelay::spawn(|req| {
        assert_eq!(req.method, "eth_callBundle");
        MockReply::result(call_bundle_result())
    })
    .await
    .unwrap();

    let args = CallBundleArgs::from_raw_txs([raw_tx()]).with_block_number(5221586);
    let res = client(&relay).call_bundle(args).await.unwrap();

    assert_eq!(res.bundle_hash, BUNDLE_HASH);
    assert_eq!(res.total_gas_used, 51000);
    assert_eq!(res.state_block_number, 5221585);
    assert_eq!(res.results.len(), 2);
    assert_eq!(res.results[0].tx_hash, TX_HASH);
    assert!(!res.is_success());
    assert_eq!(res.failures().count(), 1);

    let req = only_request(&relay);
    assert_eq!(
        req.arg(),
        json!({
            "txs": [raw_tx()],
            "blockNumber": "0x4facd2",
            "stateBlockNumber": "latest",
        })
    );
}

#[tokio::test]
async fn send_bundle() {
    let relay = MockRelay::spawn(|req| {
        assert_eq!(req.method, "eth_sendBundle");
        MockReply::result(json!({ "bundleHash": BUNDLE_HASH }))
    })
    .await
    .unwrap();

    let args =
        SendBundleArgs::new([raw_tx()], 13_000_000).with_timestamps(Some(1_000), Some(2_000));
    let res = client(&relay).send_bundle(args).await.unwrap();
    assert_eq!(res.bundle_hash, BUNDLE_HASH);

    let req = only_request(&relay);
    assert_eq!(req.arg()["blockNumber"], "0xc65d40");
    assert_eq!(req.arg()["minTimestamp"], 1_000);
    assert_eq!(req.arg()["maxTimestamp"], 2_000);
    assert!(req.arg().get("revertingTxHashes").is_none());
}

#[tokio::test]
async fn user_stats() {
    let relay = MockRelay::spawn(|req| {
        assert_eq!(req.method, "flashbots_getUserStats");
        MockReply::result(json!({
            "is_high_priority": true,
            "all_time_miner_payments": "1280749594841588639",
            "all_time_gas_simulated": "30049470846",
            "last_7d_miner_payments": "1280749594841588639",
            "last_7d_gas_simulated": "30049470846",
            "last_1d_miner_payments": "142305510537954293",
            "last_1d_gas_simulated": "2731770076"
        }))
    })
    .await
    .unwrap();

    let res = client(&relay).user_stats(UserStatsArgs::new(17_000_000)).await.unwrap();
    assert!(res.is_high_priority);
    assert_eq!(res.all_time_miner_payments, "1280749594841588639");
    assert_eq!(res.last_1d_gas_simulated, "2731770076");

    let req = only_request(&relay);
    assert_eq!(req.arg(), json!({ "blockNumber": "0x1036640" }));
}

#[tokio::test]
async fn user_stats_v2() {
    let relay = MockRelay::spawn(|req| {
        assert_eq!(req.method, "flashbots_getUserStatsV2");
        MockReply::result(json!({
            "isHighPriority": false,
            "allTimeValidatorPayments": "1280749594841588639",
            "allTimeGasSimulated": "30049470846",
            "last7dValidatorPayments": "1280749594841588639",
            "last7dGasSimulated": "30049470846",
            "last1dValidatorPayments": "142305510537954293",
            "last1dGasSimulated": "2731770076"
        }))
    })
    .await
    .unwrap();

    let res = client(&relay).user_stats_v2(UserStatsArgs::new(17_000_000)).await.unwrap();
    assert!(!res.is_high_priority);
    assert_eq!(res.last_7d_validator_payments, "1280749594841588639");
    only_request(&relay);
}

#[tokio::test]
async fn bundle_stats() {
    let relay = MockRelay::spawn(|req| {
        assert_eq!(req.method, "flashbots_getBundleStats");
        MockReply::result(json!({
            "isSimulated": true,
            "isSentToMiners": true,
            "isHighPriority": true,
            "simulatedAt": "2021-08-06T21:36:06.317Z",
            "submittedAt": "2021-08-06T21:36:06.250Z",
            "sentToMinersAt": "2021-08-06T21:36:06.343Z"
        }))
    })
    .await
    .unwrap();

    let args = BundleStatsArgs::new(BUNDLE_HASH, 13_000_000);
    let res = client(&relay).bundle_stats(args).await.unwrap();
    assert!(res.is_simulated && res.is_sent_to_miners && res.is_high_priority);
    assert_eq!(res.submitted_at.as_deref(), Some("2021-08-06T21:36:06.250Z"));

    let req = only_request(&relay);
    assert_eq!(req.arg(), json!({ "bundleHash": BUNDLE_HASH, "blockNumber": "0xc65d40" }));
}

#[tokio::test]
async fn bundle_stats_v2() {
    let relay = MockRelay::spawn(|req| {
        assert_eq!(req.method, "flashbots_getBundleStatsV2");
        MockReply::result(json!({
            "isHighPriority": true,
            "simulatedAt": "2022-10-06T21:36:06.317Z",
            "receivedAt": "2022-10-06T21:36:06.250Z",
            "consideredByBuildersAt": [
                { "pubkey": "0x81babeec8c9f2bb9c329fd8a3b176032fe0ab5f3b92a3f44d4575a231c7bd9c31d10b6328ef68ed1e8c02a3dbc8e80f9", "timestamp": "2022-10-06T21:36:06.343Z" }
            ],
            "sealedByBuildersAt": [
                { "pubkey": "0x81babeec8c9f2bb9c329fd8a3b176032fe0ab5f3b92a3f44d4575a231c7bd9c31d10b6328ef68ed1e8c02a3dbc8e80f9", "timestamp": "2022-10-06T21:36:07.742Z" }
            ]
        }))
    })
    .await
    .unwrap();

    let args = BundleStatsArgs::new(BUNDLE_HASH, 15_000_000);
    let res = client(&relay).bundle_stats_v2(args).await.unwrap();
    assert!(res.is_sealed());
    assert_eq!(res.considered_by_builders_at.map(|b| b.len()), Some(1));
    only_request(&relay);
}

#[tokio::test]
async fn send_private_transaction_echoes_hash() {
    let relay = MockRelay::spawn(|req| {
        assert_eq!(req.method, "eth_sendPrivateTransaction");
        let tx: Bytes = serde_json::from_value(req.arg()["tx"].clone()).unwrap();
        MockReply::result(json!(keccak256(&tx)))
    })
    .await
    .unwrap();

    let args = SendPrivateTxArgs::new(raw_tx())
        .with_max_block_number(17_000_025)
        .with_preferences(PrivateTxPreferences { fast: true });
    let res = client(&relay).send_private_transaction(args).await.unwrap();
    assert_eq!(res.tx_hash, keccak256(raw_tx()));

    let req = only_request(&relay);
    assert_eq!(req.arg()["maxBlockNumber"], "0x1036659");
    assert_eq!(req.arg()["preferences"], json!({ "fast": true }));
}

#[tokio::test]
async fn cancel_private_transaction() {
    let relay = MockRelay::spawn(|req| {
        assert_eq!(req.method, "eth_cancelPrivateTransaction");
        assert_eq!(req.arg(), json!({ "txHash": TX_HASH }));
        MockReply::result(json!(true))
    })
    .await
    .unwrap();

    let res = client(&relay).cancel_private_transaction(CancelPrivateTxArgs::new(TX_HASH)).await;
    assert!(res.unwrap().is_cancelled);
    only_request(&relay);
}

#[tokio::test]
async fn cancel_private_transaction_not_found() {
    let relay =
        MockRelay::spawn(|_| MockReply::error(-32000, "tx not found")).await.unwrap();

    let err = client(&relay)
        .cancel_private_transaction(CancelPrivateTxArgs::new(TX_HASH))
        .await
        .unwrap_err();

    let payload = err.as_rpc_error().unwrap();
    assert_eq!(payload.code(), -32000);
    assert_eq!(payload.message(), "tx not found");
}

#[tokio::test]
async fn error_response_fails_every_method() {
    let relay =
        MockRelay::spawn(|_| MockReply::error(-32602, "invalid params")).await.unwrap();
    let client = client(&relay);

    fn check<T: std::fmt::Debug>(res: fbrpc_client::Result<T>) {
        let err = res.unwrap_err();
        assert!(matches!(&err, RelayError::Rpc(p) if p.code() == -32602), "{err:?}");
    }

    check(client.call_bundle(CallBundleArgs::from_raw_txs([raw_tx()])).await);
    check(client.send_bundle(SendBundleArgs::new([raw_tx()], 1)).await);
    check(client.user_stats(UserStatsArgs::new(1)).await);
    check(client.user_stats_v2(UserStatsArgs::new(1)).await);
    check(client.bundle_stats(BundleStatsArgs::new(BUNDLE_HASH, 1)).await);
    check(client.bundle_stats_v2(BundleStatsArgs::new(BUNDLE_HASH, 1)).await);
    check(client.send_private_transaction(SendPrivateTxArgs::new(raw_tx())).await);
    check(client.cancel_private_transaction(CancelPrivateTxArgs::new(TX_HASH)).await);

    let methods: Vec<_> = relay.requests().into_iter().map(|r| r.method).collect();
    assert_eq!(
        methods,
        [
            "eth_callBundle",
            "eth_sendBundle",
            "flashbots_getUserStats",
            "flashbots_getUserStatsV2",
            "flashbots_getBundleStats",
            "flashbots_getBundleStatsV2",
            "eth_sendPrivateTransaction",
            "eth_cancelPrivateTransaction",
        ]
    );
}

#[tokio::test]
async fn error_wins_over_result() {
    let relay = MockRelay::spawn(|req| {
        MockReply::raw(json!({
            "jsonrpc": "2.0",
            "id": req.id,
            "result": { "bundleHash": BUNDLE_HASH },
            "error": { "code": -32000, "message": "bundle rejected" }
        }))
    })
    .await
    .unwrap();

    let err = client(&relay).send_bundle(SendBundleArgs::new([raw_tx()], 1)).await.unwrap_err();
    assert_eq!(err.as_rpc_error().map(|p| p.code()), Some(-32000));
}

#[tokio::test]
async fn non_success_status() {
    let relay = MockRelay::spawn(|_| {
        MockReply::status(StatusCode::SERVICE_UNAVAILABLE, "overloaded")
    })
    .await
    .unwrap();

    let err = client(&relay).user_stats(UserStatsArgs::new(1)).await.unwrap_err();
    match err {
        RelayError::Http { status, body } => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(body, b"overloaded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn missing_result() {
    let relay = MockRelay::spawn(|req| MockReply::raw(json!({ "jsonrpc": "2.0", "id": req.id })))
        .await
        .unwrap();

    let err = client(&relay).user_stats(UserStatsArgs::new(1)).await.unwrap_err();
    assert!(matches!(err, RelayError::MissingResult), "{err:?}");
}

#[tokio::test]
async fn malformed_result() {
    let relay = MockRelay::with_result(json!({ "bundleHash": 12 })).await.unwrap();

    let err = client(&relay).send_bundle(SendBundleArgs::new([raw_tx()], 1)).await.unwrap_err();
    assert!(matches!(err, RelayError::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn malformed_envelope() {
    let relay = MockRelay::spawn(|_| MockReply::raw(json!("not an envelope"))).await.unwrap();
    let err = client(&relay).user_stats(UserStatsArgs::new(1)).await.unwrap_err();
    assert!(matches!(err, RelayError::Decode(_)), "{err:?}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_calls_sign_their_own_bodies() {
    let relay = MockRelay::spawn(|req| {
        let block = req.arg()["blockNumber"].as_str().unwrap_or_default().to_owned();
        MockReply::result(json!({ "bundleHash": keccak256(block) }))
    })
    .await
    .unwrap();
    let client = client(&relay);

    let calls = (1..=50u64).map(|block| {
        let client = client.clone();
        async move { client.send_bundle(SendBundleArgs::new([raw_tx()], block)).await }
    });
    let results = join_all(calls).await;

    for (block, res) in (1..=50u64).zip(results) {
        let expected = keccak256(format!("{:#x}", block));
        assert_eq!(res.unwrap().bundle_hash, expected);
    }

    let requests = relay.requests();
    assert_eq!(requests.len(), 50);
    assert!(requests.iter().all(|r| r.recovered == Some(TEST_USERS[0])));

    let bodies: HashSet<_> = requests.iter().map(|r| r.body.clone()).collect();
    assert_eq!(bodies.len(), 50);
}

#[tokio::test]
async fn distinct_signers() {
    let relay = MockRelay::with_result(json!({ "bundleHash": BUNDLE_HASH })).await.unwrap();

    for (signer, user) in TEST_SIGNERS.iter().zip(TEST_USERS.iter()) {
        let client = RelayClient::with_signer(&relay.url(), signer.clone()).unwrap();
        assert_eq!(client.address(), *user);
        client.send_bundle(SendBundleArgs::new([raw_tx()], 1)).await.unwrap();
        assert_eq!(relay.last_request().unwrap().recovered, Some(*user));
    }
}

#[tokio::test]
async fn client_from_config() {
    let relay = MockRelay::with_result(json!({ "bundleHash": BUNDLE_HASH })).await.unwrap();

    let client = RelayClient::new(RelayConfig::new(relay.url(), TEST_KEYS[1])).unwrap();
    assert_eq!(client.address(), TEST_USERS[1]);
    client.send_bundle(SendBundleArgs::new([raw_tx()], 1)).await.unwrap();
    assert_eq!(relay.last_request().unwrap().recovered, Some(TEST_USERS[1]));
}

#[tokio::test]
async fn timeout() {
    let relay = MockRelay::spawn(|_| {
        MockReply::result(json!({ "bundleHash": BUNDLE_HASH })).delayed(Duration::from_secs(2))
    })
    .await
    .unwrap();

    let config =
        RelayConfig::new(relay.url(), TEST_KEYS[0]).with_timeout(Duration::from_millis(100));
    let client = RelayClient::new(config).unwrap();

    let err = client.send_bundle(SendBundleArgs::new([raw_tx()], 1)).await.unwrap_err();
    assert!(err.is_timeout(), "{err:?}");
}

#[tokio::test]
async fn timeout_while_reading_error_body() {
    let relay = MockRelay::spawn(|_| {
        MockReply::status(StatusCode::SERVICE_UNAVAILABLE, "partial")
            .stall_body(Duration::from_secs(3))
    })
    .await
    .unwrap();

    let config =
        RelayConfig::new(relay.url(), TEST_KEYS[0]).with_timeout(Duration::from_millis(300));
    let client = RelayClient::new(config).unwrap();

    let err = client.send_bundle(SendBundleArgs::new([raw_tx()], 1)).await.unwrap_err();
    assert!(err.is_timeout(), "{err:?}");
    assert!(!matches!(err, RelayError::Http { .. }));
}

#[tokio::test]
async fn cancelled_in_flight() {
    let relay = MockRelay::spawn(|_| {
        MockReply::result(json!({ "bundleHash": BUNDLE_HASH })).delayed(Duration::from_secs(2))
    })
    .await
    .unwrap();
    let client = client(&relay);

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = client
        .send_bundle_with_cancel(SendBundleArgs::new([raw_tx()], 1), &token)
        .await
        .unwrap_err();
    assert!(matches!(err, RelayError::Cancelled), "{err:?}");
}

#[tokio::test]
async fn cancelled_before_send() {
    let relay = MockRelay::with_result(json!({ "bundleHash": BUNDLE_HASH })).await.unwrap();
    let client = client(&relay);

    let token = CancellationToken::new();
    token.cancel();

    let err = client.user_stats_with_cancel(UserStatsArgs::new(1), &token).await.unwrap_err();
    assert!(matches!(err, RelayError::Cancelled), "{err:?}");
    assert!(relay.requests().is_empty());
}

#[tokio::test]
async fn uncancelled_token_completes() {
    let relay = MockRelay::with_result(json!({ "bundleHash": BUNDLE_HASH })).await.unwrap();
    let client = client(&relay);

    let token = CancellationToken::new();
    let res = client.send_bundle_with_cancel(SendBundleArgs::new([raw_tx()], 1), &token).await;
    assert_eq!(res.unwrap().bundle_hash, BUNDLE_HASH);
}

#[tokio::test]
async fn raw_request() {
    let relay = MockRelay::with_result(json!({ "ok": true })).await.unwrap();

    let params = [json!({ "replacementUuid": "01234567-89ab-cdef-0123-456789abcdef" })];
    let res = client(&relay).raw_request("eth_cancelBundle", &params).await.unwrap();
    assert_eq!(res.get(), r#"{"ok":true}"#);

    let req = only_request(&relay);
    assert_eq!(req.method, "eth_cancelBundle");
    assert!(req.id.is_u64());
}

#[tokio::test]
async fn unreachable_relay() {
    let url = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let client = RelayClient::with_signer(&url, TEST_SIGNERS[0].clone()).unwrap();
    let err = client.user_stats(UserStatsArgs::new(1)).await.unwrap_err();
    assert!(err.is_transport(), "{err:?}");
}

/// Signs something other than the body it is handed.
struct WrongBodySigner(PrivateKeySigner);

impl PayloadSigner for WrongBodySigner {
    fn address(&self) -> Address {
        self.0.address()
    }

    fn sign_payload(&self, payload: &[u8]) -> Result<String, SigningError> {
        let mut tampered = payload.to_vec();
        tampered.push(b' ');
        self.0.sign_payload(&tampered)
    }
}

#[tokio::test]
async fn relay_rejects_mismatched_signature() {
    let relay = MockRelay::with_result(json!({ "bundleHash": BUNDLE_HASH })).await.unwrap();
    let client =
        RelayClient::with_signer(&relay.url(), WrongBodySigner(TEST_SIGNERS[0].clone())).unwrap();

    let err = client.send_bundle(SendBundleArgs::new([raw_tx()], 1)).await.unwrap_err();
    assert_eq!(err.http_status().map(|s| s.as_u16()), Some(403));

    let req = relay.last_request().unwrap();
    assert!(req.signature.is_some());
    assert!(req.recovered.is_none());
}

#[test]
fn construction_errors() {
    let err = RelayClient::new(RelayConfig::new("not a url", TEST_KEYS[0])).unwrap_err();
    assert!(matches!(err, ConfigError::Url(_)), "{err:?}");

    let err = RelayClient::new(RelayConfig::new("http://127.0.0.1:1", "")).unwrap_err();
    assert!(matches!(err, ConfigError::MissingKey), "{err:?}");

    let err = RelayClient::new(RelayConfig::new("http://127.0.0.1:1", "0xdeadbeef")).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidKey(_)), "{err:?}");
}
