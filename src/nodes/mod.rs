//! Workflow nodes and the host item model they operate on.
//!
//! A node receives a batch of [`NodeItem`]s and returns one output item per
//! input item. Parameters are resolved per item through a
//! [`ParameterSource`], binary outputs are stored through a [`BinarySink`],
//! and failures follow the tolerant/strict rules of [`execute_items`].

mod binary;
mod execution;
mod item;
mod parameters;
mod speaker;
mod transcriber;

pub use binary::{BinaryData, BinarySink, BinaryStorage, DirectoryBinarySink, InlineBinarySink};
pub use execution::{ItemProcessor, execute_items};
pub use item::{NodeItem, PairedItem};
pub use parameters::{FixedParameters, ParameterSource};
pub use speaker::{DeepgramSpeakerNode, SpeakerParameters};
pub use transcriber::{
    DEFAULT_BINARY_PROPERTY, DeepgramTranscriberNode, SourceType, TranscriberParameters,
};
