//! JSON-to-tree flattening for the block explorer
//!
//! The query backend returns blocks as nested JSON; this module flattens that
//! structure into a [`TreeNode`] hierarchy the terminal UI (and the one-shot
//! CLI printer) can render. Objects and arrays become folders, scalars become
//! leaves, and base64-encoded write-set values are decoded opportunistically:
//! a value that fails to decode is shown unchanged.

use crate::models::{Block, Tx};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::Value;

/// Write-set key marking a configuration transaction.
const CONFIG_TYPE_KEY: &str = "Type";
const CONFIG_TYPE_VALUE: &str = "Config";

/// Config-transaction keys whose decoded values hold nested JSON.
const CONFIG_NESTED_KEYS: [&str; 3] = ["Groups", "Values", "Policies"];

/// One node of the rendered tree. A node is a folder iff it has children.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TreeNode {
    pub name: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        TreeNode {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn folder(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        TreeNode {
            name: name.into(),
            children,
        }
    }

    pub fn is_folder(&self) -> bool {
        !self.children.is_empty()
    }

    /// Total number of leaves in this subtree.
    pub fn leaf_count(&self) -> usize {
        if self.children.is_empty() {
            1
        } else {
            self.children.iter().map(TreeNode::leaf_count).sum()
        }
    }
}

/// Base64-decode a write-set value, falling back to the input on failure.
///
/// A value only counts as decoded when the payload is both valid base64 and
/// valid UTF-8; anything else passes through unchanged.
pub fn decode_or_identity(raw: &str) -> String {
    match BASE64.decode(raw) {
        Ok(bytes) => String::from_utf8(bytes).unwrap_or_else(|_| raw.to_string()),
        Err(_) => raw.to_string(),
    }
}

/// Flatten an arbitrary JSON value into a tree rooted at `name`.
///
/// Objects and arrays become folders with one child per member (array
/// children are named by index); scalars become `name: value` leaves. String
/// leaves under a key named `value` are base64-decoded opportunistically,
/// matching the write-set convention.
pub fn json_tree(name: &str, value: &Value) -> TreeNode {
    match value {
        Value::Object(map) => TreeNode::folder(
            name,
            map.iter().map(|(k, v)| json_tree(k, v)).collect(),
        ),
        Value::Array(items) => TreeNode::folder(
            name,
            items
                .iter()
                .enumerate()
                .map(|(i, v)| json_tree(&i.to_string(), v))
                .collect(),
        ),
        Value::String(s) => {
            let shown = if name == "value" {
                decode_or_identity(s)
            } else {
                s.clone()
            };
            TreeNode::leaf(format!("{}: {}", name, shown))
        }
        Value::Null => TreeNode::leaf(format!("{}: null", name)),
        other => TreeNode::leaf(format!("{}: {}", name, other)),
    }
}

/// True when the transaction's write set marks it as a config transaction.
fn is_config_tx(tx: &Tx) -> bool {
    tx.kv
        .iter()
        .any(|kv| kv.key == CONFIG_TYPE_KEY && decode_or_identity(&kv.value) == CONFIG_TYPE_VALUE)
}

fn kv_value_node(key: &str, decoded: String, config: bool) -> TreeNode {
    // Config transactions carry nested JSON under a few well-known keys;
    // render those as subtrees instead of one opaque leaf. Parse failure
    // falls back to the decoded string.
    if config && CONFIG_NESTED_KEYS.contains(&key) {
        if let Ok(parsed) = serde_json::from_str::<Value>(&decoded) {
            return json_tree("value", &parsed);
        }
    }
    TreeNode::leaf(format!("value: {}", decoded))
}

fn tx_tree(index: usize, tx: &Tx) -> TreeNode {
    let config = is_config_tx(tx);
    let kv_children = tx
        .kv
        .iter()
        .map(|kv| {
            TreeNode::folder(
                format!("key: {}", kv.key),
                vec![kv_value_node(&kv.key, decode_or_identity(&kv.value), config)],
            )
        })
        .collect();

    TreeNode::folder(
        index.to_string(),
        vec![
            TreeNode::leaf(format!("txid: {}", tx.txid)),
            TreeNode::leaf(format!("validationcode: {}", tx.validationcode)),
            TreeNode::leaf(format!("time: {}", tx.time)),
            TreeNode::folder("KV", kv_children),
        ],
    )
}

/// Build the display tree for a query result: a `Blocks` root holding one
/// `Block {n}` subtree per record.
pub fn block_tree(blocks: &[Block]) -> TreeNode {
    let children = blocks
        .iter()
        .map(|block| {
            let mut fields = vec![
                TreeNode::leaf(format!("channelid: {}", block.channelid)),
                TreeNode::leaf(format!("blockhash: {}", block.blockhash)),
                TreeNode::leaf(format!("previoushash: {}", block.previoushash)),
                TreeNode::leaf(format!("blocknum: {}", block.blocknum)),
            ];
            fields.push(TreeNode::folder(
                "txs",
                block
                    .txs
                    .iter()
                    .enumerate()
                    .map(|(i, tx)| tx_tree(i, tx))
                    .collect(),
            ));
            TreeNode::folder(format!("Block {}", block.blocknum), fields)
        })
        .collect();

    TreeNode::folder("Blocks", children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WriteKv;

    fn b64(s: &str) -> String {
        BASE64.encode(s.as_bytes())
    }

    fn sample_block() -> Block {
        Block {
            blocknum: 7,
            channelid: "mychannel".to_string(),
            blockhash: "aa11".to_string(),
            previoushash: "bb22".to_string(),
            txs: vec![Tx {
                txid: "af589062".to_string(),
                validationcode: 0,
                time: 1569859200,
                kv: vec![WriteKv {
                    key: "car0".to_string(),
                    value: b64("{\"owner\":\"tomoko\"}"),
                }],
            }],
        }
    }

    #[test]
    fn decode_recovers_encoded_text() {
        assert_eq!(decode_or_identity(&b64("hello")), "hello");
    }

    #[test]
    fn decode_leaves_invalid_base64_unchanged() {
        assert_eq!(decode_or_identity("not base64!"), "not base64!");
        // No padding
        assert_eq!(decode_or_identity("abcde"), "abcde");
    }

    #[test]
    fn decode_leaves_non_utf8_payload_unchanged() {
        // "/w==" decodes to the single byte 0xFF, which is not UTF-8
        assert_eq!(decode_or_identity("/w=="), "/w==");
    }

    #[test]
    fn scalars_become_leaves_and_containers_become_folders() {
        let doc = serde_json::json!({
            "a": 1,
            "b": "two",
            "c": {"d": true, "e": [1, 2, 3]},
            "f": null
        });
        let tree = json_tree("root", &doc);

        assert!(tree.is_folder());
        // Scalars: a, b, d, three array elements, f
        assert_eq!(tree.leaf_count(), 7);

        let c = tree.children.iter().find(|n| n.name == "c").unwrap();
        assert!(c.is_folder());
        let e = c.children.iter().find(|n| n.name == "e").unwrap();
        assert_eq!(e.children[0].name, "0: 1");
        assert_eq!(e.children[2].name, "2: 3");
    }

    #[test]
    fn only_value_keys_are_base64_decoded() {
        let doc = serde_json::json!({
            "value": b64("decoded"),
            "other": b64("decoded")
        });
        let tree = json_tree("root", &doc);
        let names: Vec<&str> = tree.children.iter().map(|n| n.name.as_str()).collect();
        assert!(names.contains(&"value: decoded"));
        assert!(names.contains(&format!("other: {}", b64("decoded")).as_str()));
    }

    #[test]
    fn block_tree_mirrors_the_record() {
        let tree = block_tree(&[sample_block()]);
        assert_eq!(tree.name, "Blocks");
        assert_eq!(tree.children.len(), 1);

        let block = &tree.children[0];
        assert_eq!(block.name, "Block 7");
        assert_eq!(block.children[0].name, "channelid: mychannel");
        assert_eq!(block.children[3].name, "blocknum: 7");

        let txs = &block.children[4];
        assert_eq!(txs.name, "txs");
        let tx = &txs.children[0];
        assert_eq!(tx.name, "0");
        assert_eq!(tx.children[0].name, "txid: af589062");

        let kv = &tx.children[3];
        assert_eq!(kv.name, "KV");
        assert_eq!(kv.children[0].name, "key: car0");
        assert_eq!(
            kv.children[0].children[0].name,
            "value: {\"owner\":\"tomoko\"}"
        );
    }

    #[test]
    fn block_tree_renders_one_subtree_per_record() {
        let mut second = sample_block();
        second.blocknum = 8;
        let tree = block_tree(&[sample_block(), second]);
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[1].name, "Block 8");
    }

    #[test]
    fn config_tx_nested_keys_become_subtrees() {
        let block = Block {
            blocknum: 0,
            channelid: "mychannel".to_string(),
            blockhash: "aa".to_string(),
            previoushash: "".to_string(),
            txs: vec![Tx {
                txid: "cfg".to_string(),
                validationcode: 0,
                time: 0,
                kv: vec![
                    WriteKv {
                        key: "Type".to_string(),
                        value: b64("Config"),
                    },
                    WriteKv {
                        key: "Groups".to_string(),
                        value: b64(&format!("{{\"Org1MSP\":{{\"value\":\"{}\"}}}}", b64("inner"))),
                    },
                ],
            }],
        };

        let tree = block_tree(&[block]);
        let kv = &tree.children[0].children[4].children[0].children[3];
        let groups = kv
            .children
            .iter()
            .find(|n| n.name == "key: Groups")
            .unwrap();
        // value is a folder now, not a stringified blob
        let value = &groups.children[0];
        assert!(value.is_folder());
        assert_eq!(value.name, "value");
        let org = &value.children[0];
        assert_eq!(org.name, "Org1MSP");
        // Inner "value" leaves are decoded on the way down
        assert_eq!(org.children[0].name, "value: inner");
    }

    #[test]
    fn non_config_tx_keeps_nested_keys_as_leaves() {
        let block = Block {
            blocknum: 0,
            channelid: "mychannel".to_string(),
            blockhash: "aa".to_string(),
            previoushash: "".to_string(),
            txs: vec![Tx {
                txid: "plain".to_string(),
                validationcode: 0,
                time: 0,
                kv: vec![WriteKv {
                    key: "Groups".to_string(),
                    value: b64("{\"x\":1}"),
                }],
            }],
        };

        let tree = block_tree(&[block]);
        let kv = &tree.children[0].children[4].children[0].children[3];
        let value = &kv.children[0].children[0];
        assert!(!value.is_folder());
        assert_eq!(value.name, "value: {\"x\":1}");
    }

    #[test]
    fn flattening_is_deterministic() {
        let blocks = [sample_block()];
        assert_eq!(block_tree(&blocks), block_tree(&blocks));

        let doc = serde_json::json!({"b": [1, {"a": "x"}], "a": {"value": "eA=="}});
        assert_eq!(json_tree("root", &doc), json_tree("root", &doc));
    }
}
