//! Wire types for the ledger query backend
//!
//! The backend wraps every response in an `{ error, msg }` envelope. The
//! single-block endpoints (`/byblocknum`, `/bytxid`) put one block object in
//! `msg`, while `/bykey` puts an array of blocks there; [`BlockPayload`]
//! absorbs both shapes.

use serde::{Deserialize, Serialize};

/// One key/value pair from a transaction's write set.
///
/// `value` arrives base64-encoded and is decoded opportunistically at render
/// time, never here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteKv {
    pub key: String,
    pub value: String,
}

/// One transaction inside a block record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    pub txid: String,
    pub validationcode: i32,
    /// Unix timestamp of the transaction.
    pub time: i64,
    /// Field is literally `KV` on the wire.
    #[serde(rename = "KV", default)]
    pub kv: Vec<WriteKv>,
}

/// One ledger block as returned by the query backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub blocknum: u64,
    pub channelid: String,
    pub blockhash: String,
    pub previoushash: String,
    #[serde(default)]
    pub txs: Vec<Tx>,
}

/// `msg` can hold a single block or a list of blocks depending on endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockPayload {
    One(Block),
    Many(Vec<Block>),
}

impl BlockPayload {
    pub fn into_vec(self) -> Vec<Block> {
        match self {
            BlockPayload::One(block) => vec![block],
            BlockPayload::Many(blocks) => blocks,
        }
    }
}

/// The backend's response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub error: String,
    pub msg: Option<BlockPayload>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE: &str = r#"{
        "error": "",
        "msg": {
            "blocknum": 5,
            "channelid": "mychannel",
            "blockhash": "aa11",
            "previoushash": "bb22",
            "txs": [
                {
                    "txid": "af589062",
                    "validationcode": 0,
                    "time": 1569859200,
                    "KV": [{"key": "car0", "value": "c29tZSBkYXRh"}]
                }
            ]
        }
    }"#;

    #[test]
    fn parses_single_block_envelope() {
        let resp: QueryResponse = serde_json::from_str(SINGLE).expect("parse envelope");
        assert!(resp.error.is_empty());
        let blocks = resp.msg.expect("msg present").into_vec();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].blocknum, 5);
        assert_eq!(blocks[0].txs[0].kv[0].key, "car0");
    }

    #[test]
    fn parses_block_array_envelope() {
        let json = r#"{
            "error": "",
            "msg": [
                {"blocknum": 1, "channelid": "ch", "blockhash": "a", "previoushash": "0", "txs": []},
                {"blocknum": 2, "channelid": "ch", "blockhash": "b", "previoushash": "a", "txs": []}
            ]
        }"#;
        let resp: QueryResponse = serde_json::from_str(json).expect("parse envelope");
        let blocks = resp.msg.expect("msg present").into_vec();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].previoushash, "a");
    }

    #[test]
    fn parses_error_envelope_with_null_msg() {
        let json = r#"{"error": "no such data", "msg": null}"#;
        let resp: QueryResponse = serde_json::from_str(json).expect("parse envelope");
        assert_eq!(resp.error, "no such data");
        assert!(resp.msg.is_none());
    }

    #[test]
    fn missing_kv_defaults_to_empty() {
        let json = r#"{"txid": "t", "validationcode": 0, "time": 0}"#;
        let tx: Tx = serde_json::from_str(json).expect("parse tx");
        assert!(tx.kv.is_empty());
    }
}
