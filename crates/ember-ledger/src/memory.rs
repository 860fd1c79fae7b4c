use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::debug;

use ember_storage::{InMemoryStorageNode, StorageWriter};
use ember_types::{EpochCount, RecordId, StorageHandle, TimestampMs};

use crate::error::{LedgerError, LedgerResult};
use crate::record::RecordFields;
use crate::traits::{LedgerClient, PublishCall, PublishEvent};

/// Ledger-side cap on title length, in code points.
const MAX_TITLE_CODE_POINTS: usize = 200;

#[derive(Default)]
struct LedgerState {
    next_id: u64,
    records: BTreeMap<String, RecordFields>,
    events: Vec<PublishEvent>,
}

/// In-memory ledger playing the on-chain contract's role.
///
/// Holds a reference to the storage node so the `upvote` entry point can do
/// what the contract does: increment the count and extend the blob's epoch
/// allocation in one atomic step. If the extension fails, the count does not
/// move.
///
/// Repeat upvotes by the same account are permitted; that policy belongs to
/// the entry point, and this one matches the deployed contract's behavior.
pub struct InMemoryLedger {
    storage: Arc<InMemoryStorageNode>,
    registry: RecordId,
    state: RwLock<LedgerState>,
}

impl InMemoryLedger {
    pub fn new(storage: Arc<InMemoryStorageNode>) -> Self {
        Self {
            storage,
            registry: RecordId::new("0xregistry").expect("static id is non-empty"),
            state: RwLock::new(LedgerState::default()),
        }
    }

    /// The well-known registry object all records attach to.
    pub fn registry(&self) -> &RecordId {
        &self.registry
    }

    /// Insert a record with arbitrary wire fields, bypassing `publish`.
    ///
    /// Lets tests seed legacy shapes: records without titles, records whose
    /// handle predates `blob_object_id`, records with no handle at all.
    pub fn seed(&self, fields: RecordFields) -> RecordId {
        let id = RecordId::new(fields.id.clone()).expect("seeded record id must be non-empty");
        let mut state = self.state.write().expect("lock poisoned");
        state.records.insert(fields.id.clone(), fields);
        id
    }

    /// Number of records the ledger holds.
    pub fn record_count(&self) -> usize {
        self.state.read().expect("lock poisoned").records.len()
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn publish(&self, call: PublishCall<'_>) -> LedgerResult<RecordId> {
        if call.title.is_empty() {
            return Err(LedgerError::Rejected("empty title".into()));
        }
        if call.title.chars().count() > MAX_TITLE_CODE_POINTS {
            return Err(LedgerError::Rejected(format!(
                "title exceeds {MAX_TITLE_CODE_POINTS} code points"
            )));
        }

        let mut state = self.state.write().expect("lock poisoned");
        state.next_id += 1;
        let raw_id = format!("0xrec{:04}", state.next_id);
        let timestamp = TimestampMs::now();
        state.records.insert(
            raw_id.clone(),
            RecordFields {
                id: raw_id.clone(),
                title: Some(call.title.to_string()),
                blob_id: call.content_address.as_str().to_string(),
                blob_object_id: Some(call.storage_handle.as_str().to_string()),
                author: call.author.as_str().to_string(),
                timestamp: timestamp.as_millis(),
                upvote_count: 0,
            },
        );
        let id = RecordId::new(raw_id).expect("minted id is non-empty");
        state.events.push(PublishEvent {
            record_id: id.clone(),
            author: call.author.clone(),
            timestamp,
        });
        debug!(record = %id, title = call.title, "record published");
        Ok(id)
    }

    async fn upvote(
        &self,
        record: &RecordId,
        handle: &StorageHandle,
        epochs_to_add: EpochCount,
    ) -> LedgerResult<()> {
        // Validate against the record before touching anything.
        {
            let state = self.state.read().expect("lock poisoned");
            let fields = state
                .records
                .get(record.as_str())
                .ok_or_else(|| LedgerError::Rejected(format!("unknown record {record}")))?;
            match &fields.blob_object_id {
                Some(bound) if bound == handle.as_str() => {}
                _ => {
                    return Err(LedgerError::Rejected(format!(
                        "handle {handle} is not bound to record {record}"
                    )))
                }
            }
        }

        // The contract extends and increments in one transaction; mirror
        // that by only incrementing once the extension has succeeded.
        self.storage
            .extend(handle, epochs_to_add)
            .await
            .map_err(|e| LedgerError::Rejected(e.to_string()))?;

        let mut state = self.state.write().expect("lock poisoned");
        let fields = state
            .records
            .get_mut(record.as_str())
            .ok_or_else(|| LedgerError::Rejected(format!("unknown record {record}")))?;
        fields.upvote_count += 1;
        debug!(record = %record, upvotes = fields.upvote_count, "record upvoted");
        Ok(())
    }

    async fn get_object(&self, id: &RecordId) -> LedgerResult<Option<serde_json::Value>> {
        let state = self.state.read().expect("lock poisoned");
        match state.records.get(id.as_str()) {
            Some(fields) => {
                let value = serde_json::to_value(fields)
                    .map_err(|e| LedgerError::Transport(e.to_string()))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn query_events(&self, limit: usize) -> LedgerResult<Vec<PublishEvent>> {
        let state = self.state.read().expect("lock poisoned");
        // Most recent first, bounded window.
        Ok(state.events.iter().rev().take(limit).cloned().collect())
    }

    async fn get_dynamic_fields(&self, parent: &RecordId) -> LedgerResult<Vec<RecordId>> {
        if parent != &self.registry {
            return Ok(Vec::new());
        }
        let state = self.state.read().expect("lock poisoned");
        state
            .records
            .keys()
            .map(|raw| {
                RecordId::new(raw.clone()).map_err(|e| LedgerError::MalformedRecord(e.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use ember_types::{AccountId, ContentAddress};

    use super::*;
    use crate::record::PostRecord;

    async fn certified(
        storage: &InMemoryStorageNode,
        bytes: &[u8],
    ) -> (ContentAddress, StorageHandle) {
        let owner = AccountId::new("0xauthor").unwrap();
        let reg = storage
            .register(bytes.len() as u64, EpochCount::new(5), false, &owner)
            .await
            .unwrap();
        storage.upload(&reg, bytes).await.unwrap();
        let blob = storage.certify(&reg).await.unwrap();
        (blob.address, blob.handle)
    }

    fn author() -> AccountId {
        AccountId::new("0xauthor").unwrap()
    }

    async fn publish_one(ledger: &InMemoryLedger, storage: &InMemoryStorageNode, bytes: &[u8]) -> (RecordId, StorageHandle) {
        let (address, handle) = certified(storage, bytes).await;
        let id = ledger
            .publish(PublishCall {
                title: "a post",
                content_address: &address,
                storage_handle: &handle,
                author: &author(),
            })
            .await
            .unwrap();
        (id, handle)
    }

    #[tokio::test]
    async fn publish_mints_a_record_with_zero_upvotes() {
        let storage = Arc::new(InMemoryStorageNode::new());
        let ledger = InMemoryLedger::new(Arc::clone(&storage));
        let (id, _) = publish_one(&ledger, &storage, b"content").await;

        let value = ledger.get_object(&id).await.unwrap().unwrap();
        let record = PostRecord::from_value(&value).unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.upvote_count, 0);
        assert!(record.created_at.as_millis() > 0);
    }

    #[tokio::test]
    async fn publish_rejects_oversized_titles() {
        let storage = Arc::new(InMemoryStorageNode::new());
        let ledger = InMemoryLedger::new(Arc::clone(&storage));
        let (address, handle) = certified(&storage, b"content").await;

        let long_title = "x".repeat(MAX_TITLE_CODE_POINTS + 1);
        let err = ledger
            .publish(PublishCall {
                title: &long_title,
                content_address: &address,
                storage_handle: &handle,
                author: &author(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Rejected(_)));
        assert_eq!(ledger.record_count(), 0);
    }

    #[tokio::test]
    async fn upvote_increments_and_extends_atomically() {
        let storage = Arc::new(InMemoryStorageNode::new());
        let ledger = InMemoryLedger::new(Arc::clone(&storage));
        let (id, handle) = publish_one(&ledger, &storage, b"content").await;

        let before = storage.remaining_epochs(&handle).unwrap();
        ledger.upvote(&id, &handle, EpochCount::ONE).await.unwrap();

        let value = ledger.get_object(&id).await.unwrap().unwrap();
        let record = PostRecord::from_value(&value).unwrap();
        assert_eq!(record.upvote_count, 1);
        assert_eq!(
            storage.remaining_epochs(&handle).unwrap(),
            before.saturating_add(EpochCount::ONE)
        );
    }

    #[tokio::test]
    async fn failed_extension_leaves_the_count_untouched() {
        let storage = Arc::new(InMemoryStorageNode::new());
        let ledger = InMemoryLedger::new(Arc::clone(&storage));

        // Record bound to a handle the storage node has never heard of.
        let id = ledger.seed(RecordFields {
            id: "0xghost".into(),
            title: Some("ghost".into()),
            blob_id: "addr-ghost".into(),
            blob_object_id: Some("0xnohandle".into()),
            author: "0xauthor".into(),
            timestamp: 1,
            upvote_count: 7,
        });
        let handle = StorageHandle::new("0xnohandle").unwrap();

        assert!(ledger.upvote(&id, &handle, EpochCount::ONE).await.is_err());
        let value = ledger.get_object(&id).await.unwrap().unwrap();
        let record = PostRecord::from_value(&value).unwrap();
        assert_eq!(record.upvote_count, 7);
    }

    #[tokio::test]
    async fn upvote_with_unbound_handle_is_rejected() {
        let storage = Arc::new(InMemoryStorageNode::new());
        let ledger = InMemoryLedger::new(Arc::clone(&storage));
        let (id, _) = publish_one(&ledger, &storage, b"one").await;
        let (_, other_handle) = certified(&storage, b"two").await;

        let err = ledger.upvote(&id, &other_handle, EpochCount::ONE).await.unwrap_err();
        assert!(matches!(err, LedgerError::Rejected(_)));
    }

    #[tokio::test]
    async fn events_window_is_bounded_and_newest_first() {
        let storage = Arc::new(InMemoryStorageNode::new());
        let ledger = InMemoryLedger::new(Arc::clone(&storage));
        let mut ids = Vec::new();
        for i in 0..5 {
            let (id, _) = publish_one(&ledger, &storage, format!("post {i}").as_bytes()).await;
            ids.push(id);
        }

        let events = ledger.query_events(3).await.unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].record_id, ids[4]);
        assert_eq!(events[2].record_id, ids[2]);
    }

    #[tokio::test]
    async fn dynamic_fields_enumerate_only_the_registry() {
        let storage = Arc::new(InMemoryStorageNode::new());
        let ledger = InMemoryLedger::new(Arc::clone(&storage));
        let (id, _) = publish_one(&ledger, &storage, b"content").await;

        let attached = ledger.get_dynamic_fields(ledger.registry()).await.unwrap();
        assert_eq!(attached, vec![id]);

        let elsewhere = RecordId::new("0xother").unwrap();
        assert!(ledger.get_dynamic_fields(&elsewhere).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_object_for_unknown_id_is_none() {
        let storage = Arc::new(InMemoryStorageNode::new());
        let ledger = InMemoryLedger::new(storage);
        let missing = RecordId::new("0xmissing").unwrap();
        assert!(ledger.get_object(&missing).await.unwrap().is_none());
    }
}
