//! Error types shared by the Deepgram nodes.
//!
//! Every failure a node can produce is classified into one of four kinds:
//!
//! | Variant | Raised when | Fatal? |
//! |---------|-------------|--------|
//! | [`NodeError::ConfigurationError`] | credentials missing or invalid | always, before any item runs |
//! | [`NodeError::ValidationError`] | bad per-item input (empty text, missing URL) | per item, unless `continue_on_fail` |
//! | [`NodeError::ProviderError`] | the remote API reported a failure or sent non-audio content | per item, unless `continue_on_fail` |
//! | [`NodeError::TransportError`] | network or stream I/O failed | per item, unless `continue_on_fail` |
//!
//! Validation always runs before the network call, so a `ValidationError`
//! never costs a request.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for node operations.
pub type NodeResult<T> = Result<T, NodeError>;

/// Errors raised while processing a node item.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NodeError {
    /// Missing or invalid credentials / client configuration
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Invalid user input for a single item
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The provider reported an error or returned unexpected content
    #[error("{0}")]
    ProviderError(String),

    /// Network or stream I/O failure
    #[error("Transport error: {0}")]
    TransportError(String),
}

impl NodeError {
    /// Classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigurationError(_) => ErrorKind::Configuration,
            Self::ValidationError(_) => ErrorKind::Validation,
            Self::ProviderError(_) => ErrorKind::Provider,
            Self::TransportError(_) => ErrorKind::Transport,
        }
    }

    /// The bare message, without the kind prefix added by `Display`.
    pub fn message(&self) -> &str {
        match self {
            Self::ConfigurationError(msg)
            | Self::ValidationError(msg)
            | Self::ProviderError(msg)
            | Self::TransportError(msg) => msg,
        }
    }

    /// Attach the originating item index.
    pub fn at_item(self, item_index: usize) -> NodeOperationError {
        NodeOperationError {
            item_index,
            source: self,
        }
    }
}

/// Serializable classification of a [`NodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Validation,
    Provider,
    Transport,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Configuration => write!(f, "configuration"),
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::Provider => write!(f, "provider"),
            ErrorKind::Transport => write!(f, "transport"),
        }
    }
}

/// A [`NodeError`] tagged with the index of the item that produced it.
///
/// This is what aborts a batch when `continue_on_fail` is disabled.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{source} [item {item_index}]")]
pub struct NodeOperationError {
    /// Zero-based index of the failing input item
    pub item_index: usize,
    /// The underlying failure
    pub source: NodeError,
}

/// A failure recorded on an output item instead of aborting the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemErrorRecord {
    pub message: String,
    pub kind: ErrorKind,
    pub item_index: usize,
}

impl ItemErrorRecord {
    pub fn new(item_index: usize, error: &NodeError) -> Self {
        Self {
            message: error.message().to_string(),
            kind: error.kind(),
            item_index,
        }
    }
}
