//! Integration tests for the explorer query client
//!
//! Spins up a small axum stand-in for the external query backend and drives
//! the full fetch-then-flatten pipeline against it.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use fabtree::client::ExplorerClient;
use fabtree::error::ExplorerError;
use fabtree::tree::block_tree;
use serde_json::{json, Value};
use std::net::SocketAddr;

fn block_json(blocknum: u64) -> Value {
    json!({
        "blocknum": blocknum,
        "channelid": "mychannel",
        "blockhash": format!("hash{}", blocknum),
        "previoushash": format!("hash{}", blocknum.saturating_sub(1)),
        "txs": [{
            "txid": "af589062d2e699c9b0ba36e831609876f0ebae99",
            "validationcode": 0,
            "time": 1569859200,
            "KV": [{"key": "car0", "value": BASE64.encode(b"{\"owner\":\"tomoko\"}")}]
        }]
    })
}

async fn by_blocknum(Path(n): Path<u64>) -> (StatusCode, Json<Value>) {
    if n > 100 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "no such data", "msg": null})),
        );
    }
    (StatusCode::OK, Json(json!({"error": "", "msg": block_json(n)})))
}

async fn by_txid(Path(_txid): Path<String>) -> Json<Value> {
    Json(json!({"error": "", "msg": block_json(3)}))
}

async fn by_key(Path(_key): Path<String>) -> Json<Value> {
    // The key index spans blocks, so this endpoint returns an array
    Json(json!({"error": "", "msg": [block_json(1), block_json(2)]}))
}

async fn spawn_backend() -> SocketAddr {
    let app = Router::new()
        .route("/byblocknum/:n", get(by_blocknum))
        .route("/bytxid/:txid", get(by_txid))
        .route("/bykey/:key", get(by_key));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    addr
}

#[tokio::test]
async fn block_query_flattens_into_a_tree() {
    let addr = spawn_backend().await;
    let client = ExplorerClient::new(&format!("http://{}", addr)).expect("client");

    let blocks = client.by_blocknum(5).await.expect("fetch block");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].blocknum, 5);

    let tree = block_tree(&blocks);
    assert_eq!(tree.name, "Blocks");
    assert_eq!(tree.children[0].name, "Block 5");

    // The write-set value comes back decoded
    let kv = &tree.children[0].children[4].children[0].children[3];
    assert_eq!(
        kv.children[0].children[0].name,
        "value: {\"owner\":\"tomoko\"}"
    );
}

#[tokio::test]
async fn txid_query_returns_the_containing_block() {
    let addr = spawn_backend().await;
    let client = ExplorerClient::new(&format!("http://{}", addr)).expect("client");

    let blocks = client
        .by_txid("af589062d2e699c9b0ba36e831609876f0ebae99")
        .await
        .expect("fetch by txid");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].blocknum, 3);
}

#[tokio::test]
async fn key_query_returns_every_touching_block() {
    let addr = spawn_backend().await;
    let client = ExplorerClient::new(&format!("http://{}", addr)).expect("client");

    let blocks = client.by_key("car0").await.expect("fetch by key");
    assert_eq!(blocks.len(), 2);

    let tree = block_tree(&blocks);
    assert_eq!(tree.children.len(), 2);
    assert_eq!(tree.children[1].name, "Block 2");
}

#[tokio::test]
async fn missing_block_surfaces_the_backend_error() {
    let addr = spawn_backend().await;
    let client = ExplorerClient::new(&format!("http://{}", addr)).expect("client");

    let err = client.by_blocknum(999).await.expect_err("should fail");
    match err {
        ExplorerError::BackendError { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "no such data");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_backend_is_an_http_error() {
    // Nothing listens here
    let client = ExplorerClient::new("http://127.0.0.1:1").expect("client");
    let err = client.by_blocknum(0).await.expect_err("should fail");
    assert!(matches!(err, ExplorerError::HttpError(_)));
}
