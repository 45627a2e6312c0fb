pub mod config;
pub mod core;
pub mod errors;
pub mod nodes;
pub mod utils;

// Re-export commonly used items for convenience
pub use config::NodesConfig;
pub use core::*;
pub use errors::{ErrorKind, ItemErrorRecord, NodeError, NodeOperationError, NodeResult};
pub use nodes::{
    DeepgramSpeakerNode, DeepgramTranscriberNode, NodeItem, SpeakerParameters,
    TranscriberParameters,
};
