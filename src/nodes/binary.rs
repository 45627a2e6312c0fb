//! Binary attachments and the sink that stores them.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::{NodeError, NodeResult};

/// A binary attachment on a [`NodeItem`](super::NodeItem).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryData {
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(flatten)]
    pub storage: BinaryStorage,
}

/// Where the bytes of a [`BinaryData`] live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BinaryStorage {
    /// Base64 encoded in the item itself
    Inline {
        #[serde(with = "base64_bytes")]
        data: Bytes,
    },
    /// Stored on disk
    File { path: PathBuf },
}

impl BinaryData {
    /// Inline attachment.
    pub fn inline(data: Bytes, file_name: Option<String>, mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            file_name,
            file_size: Some(data.len() as u64),
            storage: BinaryStorage::Inline { data },
        }
    }

    /// Load the attachment bytes.
    ///
    /// # Errors
    /// `TransportError` when a file-backed attachment cannot be read.
    pub async fn read(&self) -> NodeResult<Bytes> {
        match &self.storage {
            BinaryStorage::Inline { data } => Ok(data.clone()),
            BinaryStorage::File { path } => tokio::fs::read(path).await.map(Bytes::from).map_err(
                |e| {
                    NodeError::TransportError(format!(
                        "Failed to read binary file {}: {e}",
                        path.display()
                    ))
                },
            ),
        }
    }
}

mod base64_bytes {
    use super::BASE64;
    use base64::Engine;
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64
            .decode(encoded.trim())
            .map(Bytes::from)
            .map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Binary Sinks
// =============================================================================

/// Turns produced bytes into an attachment handle.
#[async_trait]
pub trait BinarySink: Send + Sync {
    async fn prepare(
        &self,
        data: Bytes,
        file_name: &str,
        mime_type: &str,
    ) -> NodeResult<BinaryData>;
}

/// Keeps the bytes inside the output item.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineBinarySink;

#[async_trait]
impl BinarySink for InlineBinarySink {
    async fn prepare(
        &self,
        data: Bytes,
        file_name: &str,
        mime_type: &str,
    ) -> NodeResult<BinaryData> {
        Ok(BinaryData::inline(
            data,
            Some(file_name.to_string()),
            mime_type,
        ))
    }
}

/// Writes each attachment to a directory under a random file name.
#[derive(Debug, Clone)]
pub struct DirectoryBinarySink {
    directory: PathBuf,
}

impl DirectoryBinarySink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

#[async_trait]
impl BinarySink for DirectoryBinarySink {
    async fn prepare(
        &self,
        data: Bytes,
        file_name: &str,
        mime_type: &str,
    ) -> NodeResult<BinaryData> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| {
                NodeError::TransportError(format!(
                    "Failed to create binary directory {}: {e}",
                    self.directory.display()
                ))
            })?;

        let stored_name = match Path::new(file_name).extension().and_then(|e| e.to_str()) {
            Some(extension) => format!("{}.{extension}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        };
        let path = self.directory.join(stored_name);

        tokio::fs::write(&path, &data).await.map_err(|e| {
            NodeError::TransportError(format!(
                "Failed to write binary file {}: {e}",
                path.display()
            ))
        })?;

        debug!(path = %path.display(), bytes = data.len(), "Stored binary attachment");

        Ok(BinaryData {
            mime_type: mime_type.to_string(),
            file_name: Some(file_name.to_string()),
            file_size: Some(data.len() as u64),
            storage: BinaryStorage::File { path },
        })
    }
}
