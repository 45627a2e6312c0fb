//! Per-item parameter resolution.
//!
//! Workflow hosts resolve node parameters per item (expressions may read the
//! item's JSON), so nodes ask a [`ParameterSource`] for every item instead of
//! holding one parameter set.

use super::item::NodeItem;
use crate::errors::NodeResult;

/// Resolves typed node parameters for one item.
pub trait ParameterSource<P>: Send + Sync {
    fn resolve(&self, item_index: usize, item: &NodeItem) -> NodeResult<P>;
}

impl<P, F> ParameterSource<P> for F
where
    F: Fn(usize, &NodeItem) -> NodeResult<P> + Send + Sync,
{
    fn resolve(&self, item_index: usize, item: &NodeItem) -> NodeResult<P> {
        self(item_index, item)
    }
}

/// The same parameters for every item.
#[derive(Debug, Clone, Default)]
pub struct FixedParameters<P>(pub P);

impl<P: Clone + Send + Sync> ParameterSource<P> for FixedParameters<P> {
    fn resolve(&self, _item_index: usize, _item: &NodeItem) -> NodeResult<P> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::NodeError;

    #[test]
    fn test_fixed_parameters() {
        let source = FixedParameters("nova-2".to_string());
        assert_eq!(source.resolve(5, &NodeItem::default()).unwrap(), "nova-2");
    }

    #[test]
    fn test_closure_source_sees_item() {
        let source = |index: usize, item: &NodeItem| -> NodeResult<String> {
            item.json
                .get("text")
                .and_then(|v| v.as_str())
                .map(|s| format!("{index}:{s}"))
                .ok_or_else(|| NodeError::ValidationError("missing text".into()))
        };

        let mut item = NodeItem::default();
        assert!(source.resolve(0, &item).is_err());

        item.json.insert("text".into(), "hi".into());
        assert_eq!(source.resolve(1, &item).unwrap(), "1:hi");
    }
}
