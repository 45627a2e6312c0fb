//! Per-item execution loop shared by every node.
//!
//! Items are processed one at a time, in input order. Each item either
//! produces exactly one output item or fails:
//!
//! - tolerant mode (`continue_on_fail`): the failure becomes an error-tagged
//!   item at the same position and processing continues
//! - strict mode: the first failure aborts the batch, tagged with its item index

use async_trait::async_trait;
use tracing::{error, warn};

use super::item::NodeItem;
use crate::errors::{NodeError, NodeOperationError, NodeResult};

/// Processing logic for a single item.
#[async_trait]
pub trait ItemProcessor: Send + Sync {
    /// Node name used in log output.
    fn name(&self) -> &'static str;

    async fn process_item(&self, item_index: usize, item: &NodeItem) -> NodeResult<NodeItem>;

    /// Output item recorded for a failure in tolerant mode.
    fn error_item(&self, item_index: usize, item: &NodeItem, error: &NodeError) -> NodeItem {
        item.failed(item_index, error, true)
    }
}

/// Run `processor` over `items`.
///
/// On success the output has one item per input item, in input order.
pub async fn execute_items<P>(
    processor: &P,
    items: &[NodeItem],
    continue_on_fail: bool,
) -> Result<Vec<NodeItem>, NodeOperationError>
where
    P: ItemProcessor + ?Sized,
{
    let mut output = Vec::with_capacity(items.len());

    for (item_index, item) in items.iter().enumerate() {
        match processor.process_item(item_index, item).await {
            Ok(processed) => output.push(processed),
            Err(err) if continue_on_fail => {
                warn!(
                    node = processor.name(),
                    item_index,
                    kind = %err.kind(),
                    "Item failed, continuing: {}",
                    err
                );
                output.push(processor.error_item(item_index, item, &err));
            }
            Err(err) => {
                error!(
                    node = processor.name(),
                    item_index,
                    kind = %err.kind(),
                    "Item failed, aborting batch: {}",
                    err
                );
                return Err(err.at_item(item_index));
            }
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use serde_json::{Map, Value, json};
    use std::sync::Mutex;

    /// Fails items whose `fail` field is true and records the call order.
    struct Recorder {
        seen: Mutex<Vec<usize>>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ItemProcessor for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        async fn process_item(&self, item_index: usize, item: &NodeItem) -> NodeResult<NodeItem> {
            self.seen.lock().unwrap().push(item_index);
            if item.json.get("fail") == Some(&Value::Bool(true)) {
                return Err(NodeError::ValidationError("bad item".into()));
            }
            let mut json = item.json.clone();
            json.insert("done".into(), json!(true));
            Ok(NodeItem::derived(item_index, json))
        }
    }

    fn items(fail: &[bool]) -> Vec<NodeItem> {
        fail.iter()
            .enumerate()
            .map(|(i, f)| {
                let mut json = Map::new();
                json.insert("n".into(), json!(i));
                json.insert("fail".into(), json!(f));
                NodeItem::from_json(json)
            })
            .collect()
    }

    #[tokio::test]
    async fn test_all_items_succeed_in_order() {
        let recorder = Recorder::new();
        let input = items(&[false, false, false]);

        let output = execute_items(&recorder, &input, false).await.unwrap();

        assert_eq!(output.len(), 3);
        for (i, item) in output.iter().enumerate() {
            assert_eq!(item.json["n"], json!(i));
            assert_eq!(item.paired_item.unwrap().item, i);
        }
    }

    #[tokio::test]
    async fn test_tolerant_mode_keeps_position() {
        let recorder = Recorder::new();
        let input = items(&[false, true, false]);

        let output = execute_items(&recorder, &input, true).await.unwrap();

        assert_eq!(output.len(), 3);
        assert_eq!(output[0].json["done"], json!(true));
        assert_eq!(output[2].json["done"], json!(true));

        let failed = &output[1];
        assert_eq!(failed.json, input[1].json);
        let record = failed.error.as_ref().unwrap();
        assert_eq!(record.kind, ErrorKind::Validation);
        assert_eq!(record.item_index, 1);
        assert_eq!(*recorder.seen.lock().unwrap(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_strict_mode_aborts_on_first_failure() {
        let recorder = Recorder::new();
        let input = items(&[false, true, true]);

        let err = execute_items(&recorder, &input, false).await.unwrap_err();

        assert_eq!(err.item_index, 1);
        assert_eq!(err.source, NodeError::ValidationError("bad item".into()));
        // Item 2 never ran
        assert_eq!(*recorder.seen.lock().unwrap(), vec![0, 1]);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let recorder = Recorder::new();
        let output = execute_items(&recorder, &[], false).await.unwrap();
        assert!(output.is_empty());
    }
}
