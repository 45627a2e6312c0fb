use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::binary::BinaryData;
use crate::errors::{ItemErrorRecord, NodeError};

/// Back-reference from an output item to the input item it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedItem {
    pub item: usize,
}

/// One item flowing through a workflow node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeItem {
    #[serde(default)]
    pub json: Map<String, Value>,

    /// Named binary attachments
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub binary: BTreeMap<String, BinaryData>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paired_item: Option<PairedItem>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ItemErrorRecord>,
}

impl NodeItem {
    pub fn from_json(json: Map<String, Value>) -> Self {
        Self {
            json,
            ..Default::default()
        }
    }

    pub fn with_binary(mut self, property: impl Into<String>, binary: BinaryData) -> Self {
        self.binary.insert(property.into(), binary);
        self
    }

    /// Output item derived from the input item at `item_index`.
    pub fn derived(item_index: usize, json: Map<String, Value>) -> Self {
        Self {
            json,
            paired_item: Some(PairedItem { item: item_index }),
            ..Default::default()
        }
    }

    /// Error-tagged copy of this item's JSON, optionally with its binary.
    pub fn failed(&self, item_index: usize, error: &NodeError, keep_binary: bool) -> Self {
        Self {
            json: self.json.clone(),
            binary: if keep_binary {
                self.binary.clone()
            } else {
                BTreeMap::new()
            },
            paired_item: Some(PairedItem { item: item_index }),
            error: Some(ItemErrorRecord::new(item_index, error)),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use serde_json::json;

    fn sample() -> NodeItem {
        let json = json!({"id": 3, "text": "hello"});
        let Value::Object(map) = json else {
            unreachable!()
        };
        NodeItem::from_json(map).with_binary(
            "data",
            BinaryData::inline(Bytes::from_static(b"abc"), None, "audio/wav"),
        )
    }

    #[test]
    fn test_failed_item_keeps_json() {
        let item = sample();
        let err = NodeError::ValidationError("Text to speak cannot be empty".into());

        let failed = item.failed(2, &err, true);
        assert_eq!(failed.json, item.json);
        assert_eq!(failed.binary, item.binary);
        assert_eq!(failed.paired_item, Some(PairedItem { item: 2 }));
        assert!(failed.is_error());

        let failed = item.failed(2, &err, false);
        assert!(failed.binary.is_empty());
    }

    #[test]
    fn test_item_json_shape() {
        let value = serde_json::to_value(NodeItem::derived(0, Map::new())).unwrap();
        assert_eq!(value, json!({"json": {}, "pairedItem": {"item": 0}}));

        let parsed: NodeItem = serde_json::from_value(json!({
            "json": {"a": 1},
            "binary": {"data": {"mimeType": "audio/wav", "data": "YWJj"}}
        }))
        .unwrap();
        assert_eq!(parsed.json["a"], json!(1));
        assert!(parsed.binary.contains_key("data"));
        assert!(!parsed.is_error());
    }
}
