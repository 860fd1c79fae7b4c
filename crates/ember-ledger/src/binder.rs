use std::sync::Arc;

use tracing::info;

use ember_storage::CertifiedBlob;
use ember_types::{AccountId, EpochCount, RecordId};

use crate::error::{LedgerError, PreconditionError};
use crate::record::PostRecord;
use crate::traits::{LedgerClient, PublishCall};

/// Errors of the record binder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BinderError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Builds and submits the two ledger transactions of a post's life: the
/// create-record transaction binding a certified blob, and the later
/// extend-lifespan transaction referencing the same blob.
///
/// Taking a [`CertifiedBlob`] for creation is deliberate: only a completed
/// upload flow can produce one, so a record can never reference a blob that
/// was not certified first.
pub struct LedgerBinder<L> {
    ledger: Arc<L>,
    author: AccountId,
}

impl<L: LedgerClient> LedgerBinder<L> {
    pub fn new(ledger: Arc<L>, author: AccountId) -> Self {
        Self { ledger, author }
    }

    pub fn author(&self) -> &AccountId {
        &self.author
    }

    /// Submit the `publish` transaction and extract the new record's id from
    /// its confirmation.
    pub async fn create_record(
        &self,
        title: &str,
        blob: &CertifiedBlob,
    ) -> Result<RecordId, BinderError> {
        let id = self
            .ledger
            .publish(PublishCall {
                title,
                content_address: &blob.address,
                storage_handle: &blob.handle,
                author: &self.author,
            })
            .await?;
        info!(record = %id, address = %blob.address.short(), "post record created");
        Ok(id)
    }

    /// Submit the `upvote` transaction for a record, extending its blob's
    /// allocation by `epochs_to_add`.
    ///
    /// Fails with a precondition error before any ledger call when the
    /// record carries no storage handle.
    pub async fn extend_lifespan(
        &self,
        record: &PostRecord,
        epochs_to_add: EpochCount,
    ) -> Result<(), BinderError> {
        let handle = record
            .storage_handle
            .as_ref()
            .ok_or(PreconditionError::MissingStorageHandle)?;
        self.ledger
            .upvote(&record.id, handle, epochs_to_add)
            .await?;
        info!(record = %record.id, %epochs_to_add, "lifespan extended");
        Ok(())
    }

    /// Fetch and parse the authoritative record state.
    pub async fn fetch_record(&self, id: &RecordId) -> Result<Option<PostRecord>, BinderError> {
        match self.ledger.get_object(id).await? {
            Some(value) => Ok(Some(PostRecord::from_value(&value)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use ember_storage::{InMemoryStorageNode, UploadFlow};
    use ember_types::ContentAddress;

    use super::*;
    use crate::memory::InMemoryLedger;
    use crate::record::RecordFields;

    fn author() -> AccountId {
        AccountId::new("0xauthor").unwrap()
    }

    async fn certify(storage: &InMemoryStorageNode, bytes: &[u8]) -> CertifiedBlob {
        let mut flow = UploadFlow::new(bytes.to_vec(), author(), EpochCount::new(5));
        flow.run(storage).await.unwrap()
    }

    #[tokio::test]
    async fn create_record_binds_the_certified_blob() {
        let storage = Arc::new(InMemoryStorageNode::new());
        let ledger = Arc::new(InMemoryLedger::new(Arc::clone(&storage)));
        let binder = LedgerBinder::new(Arc::clone(&ledger), author());

        let blob = certify(&storage, b"bound content").await;
        let id = binder.create_record("bound", &blob).await.unwrap();

        let record = binder.fetch_record(&id).await.unwrap().unwrap();
        assert_eq!(record.content_address, blob.address);
        assert_eq!(record.storage_handle.as_ref(), Some(&blob.handle));
        assert_eq!(record.author, author());
    }

    #[tokio::test]
    async fn extend_lifespan_requires_a_handle() {
        let storage = Arc::new(InMemoryStorageNode::new());
        let ledger = Arc::new(InMemoryLedger::new(Arc::clone(&storage)));
        let binder = LedgerBinder::new(Arc::clone(&ledger), author());

        let record = PostRecord {
            id: RecordId::new("0xlegacy").unwrap(),
            title: None,
            content_address: ContentAddress::from_bytes(b"old"),
            storage_handle: None,
            author: author(),
            created_at: 1.into(),
            upvote_count: 0,
        };
        let err = binder.extend_lifespan(&record, EpochCount::ONE).await.unwrap_err();
        assert_eq!(
            err,
            BinderError::Precondition(PreconditionError::MissingStorageHandle)
        );
    }

    #[tokio::test]
    async fn extend_lifespan_reaches_the_storage_allocation() {
        let storage = Arc::new(InMemoryStorageNode::new());
        let ledger = Arc::new(InMemoryLedger::new(Arc::clone(&storage)));
        let binder = LedgerBinder::new(Arc::clone(&ledger), author());

        let blob = certify(&storage, b"extended").await;
        let id = binder.create_record("extended", &blob).await.unwrap();
        let record = binder.fetch_record(&id).await.unwrap().unwrap();

        let before = storage.remaining_epochs(&blob.handle).unwrap();
        binder.extend_lifespan(&record, EpochCount::ONE).await.unwrap();
        assert_eq!(
            storage.remaining_epochs(&blob.handle).unwrap(),
            before.saturating_add(EpochCount::ONE)
        );
    }

    #[tokio::test]
    async fn ledger_rejection_surfaces_verbatim() {
        let storage = Arc::new(InMemoryStorageNode::new());
        let ledger = Arc::new(InMemoryLedger::new(Arc::clone(&storage)));
        let binder = LedgerBinder::new(Arc::clone(&ledger), author());

        ledger.seed(RecordFields {
            id: "0xghost".into(),
            title: None,
            blob_id: "addr".into(),
            blob_object_id: Some("0xdangling".into()),
            author: "0xauthor".into(),
            timestamp: 1,
            upvote_count: 0,
        });
        let record = binder
            .fetch_record(&RecordId::new("0xghost").unwrap())
            .await
            .unwrap()
            .unwrap();

        let err = binder.extend_lifespan(&record, EpochCount::ONE).await.unwrap_err();
        assert!(matches!(err, BinderError::Ledger(LedgerError::Rejected(_))));
    }
}
