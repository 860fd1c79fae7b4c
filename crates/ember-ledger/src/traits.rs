use async_trait::async_trait;

use ember_types::{AccountId, ContentAddress, EpochCount, RecordId, StorageHandle, TimestampMs};

use crate::error::LedgerResult;

/// Arguments of the `publish` entry point.
///
/// The registry reference and the ledger's time source are fixed per
/// deployment, so implementations carry them from configuration rather than
/// taking them per call.
#[derive(Clone, Debug)]
pub struct PublishCall<'a> {
    pub title: &'a str,
    pub content_address: &'a ContentAddress,
    pub storage_handle: &'a StorageHandle,
    pub author: &'a AccountId,
}

/// One historical publish event, as surfaced by the ledger's event log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishEvent {
    pub record_id: RecordId,
    pub author: AccountId,
    pub timestamp: TimestampMs,
}

/// Client boundary to the ledger.
///
/// The two entry points each build, sign, and submit one atomic transaction;
/// signing itself is the wallet's concern. Reads are eventually consistent.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Invoke the `publish` entry point, minting a post record bound to a
    /// certified blob. Returns the assigned record id on confirmation.
    async fn publish(&self, call: PublishCall<'_>) -> LedgerResult<RecordId>;

    /// Invoke the `upvote` entry point: atomically increments the record's
    /// upvote count and extends the referenced handle's epoch allocation by
    /// `epochs_to_add`.
    async fn upvote(
        &self,
        record: &RecordId,
        handle: &StorageHandle,
        epochs_to_add: EpochCount,
    ) -> LedgerResult<()>;

    /// Fetch an object's payload. `Ok(None)` when the id does not resolve.
    async fn get_object(&self, id: &RecordId) -> LedgerResult<Option<serde_json::Value>>;

    /// Scan a bounded window of the most recent publish events.
    async fn query_events(&self, limit: usize) -> LedgerResult<Vec<PublishEvent>>;

    /// Enumerate objects attached to a registry object.
    async fn get_dynamic_fields(&self, parent: &RecordId) -> LedgerResult<Vec<RecordId>>;
}
