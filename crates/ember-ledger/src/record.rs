use serde::{Deserialize, Serialize};

use ember_types::{AccountId, ContentAddress, RecordId, StorageHandle, TimestampMs};

use crate::error::LedgerError;

/// Display fallback for records whose title field is absent.
pub const UNTITLED: &str = "Untitled";

/// Ledger-resident wire shape of a post record.
///
/// Field names follow the on-chain object. Early records carry the handle
/// under `shared_blob_id` rather than `blob_object_id`, and the oldest carry
/// no handle at all; both still parse.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFields {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub blob_id: String,
    #[serde(default, alias = "shared_blob_id")]
    pub blob_object_id: Option<String>,
    pub author: String,
    pub timestamp: u64,
    pub upvote_count: u64,
}

/// The authoritative entity representing one published post.
///
/// Immutable except for `upvote_count`, which the ledger increments by
/// exactly one per successful upvote transaction. The content bytes behind
/// `content_address` live on the storage network and may expire; the record
/// then persists as a metadata-only tombstone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostRecord {
    pub id: RecordId,
    pub title: Option<String>,
    pub content_address: ContentAddress,
    pub storage_handle: Option<StorageHandle>,
    pub author: AccountId,
    pub created_at: TimestampMs,
    pub upvote_count: u64,
}

impl PostRecord {
    /// Title for display; records lacking one render as [`UNTITLED`].
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED)
    }

    /// Whether upvote-driven lifespan extension is available.
    pub fn can_extend(&self) -> bool {
        self.storage_handle.is_some()
    }

    /// Interpret wire fields as a record, validating the identifiers.
    pub fn from_fields(fields: RecordFields) -> Result<Self, LedgerError> {
        let id = RecordId::new(fields.id)
            .map_err(|e| LedgerError::MalformedRecord(e.to_string()))?;
        let content_address = ContentAddress::new(fields.blob_id)
            .map_err(|e| LedgerError::MalformedRecord(e.to_string()))?;
        let storage_handle = fields
            .blob_object_id
            .map(StorageHandle::new)
            .transpose()
            .map_err(|e| LedgerError::MalformedRecord(e.to_string()))?;
        let author = AccountId::new(fields.author)
            .map_err(|e| LedgerError::MalformedRecord(e.to_string()))?;
        Ok(Self {
            id,
            title: fields.title,
            content_address,
            storage_handle,
            author,
            created_at: TimestampMs::new(fields.timestamp),
            upvote_count: fields.upvote_count,
        })
    }

    /// Parse an object payload fetched from the ledger.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, LedgerError> {
        let fields: RecordFields = serde_json::from_value(value.clone())
            .map_err(|e| LedgerError::MalformedRecord(e.to_string()))?;
        Self::from_fields(fields)
    }
}
