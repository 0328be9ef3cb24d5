use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Catalog entry for one stored object.
///
/// Both timestamps come from the file's modification time: the store keeps no
/// separate creation time.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ObjectInfo {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl ObjectInfo {
    pub fn new(name: String, modified_at: DateTime<Utc>) -> Self {
        Self {
            name,
            created_at: modified_at,
            modified_at,
        }
    }
}

/// One inbound unit of an upload stream.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UploadChunk {
    pub filename: String,
    pub content: Vec<u8>,
}

impl UploadChunk {
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// Result of a committed upload.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UploadReceipt {
    pub filename: String,
    pub bytes: u64,
    pub chunks: u64,
    pub message: String,
}
