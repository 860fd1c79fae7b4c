use std::sync::Arc;

use tracing::{debug, info};

use ember_content::{encode, PostDraft};
use ember_curation::CurationEngine;
use ember_feed::{hydrate, ContentFetcher, ContentState, FeedAssembler, HydratedPost};
use ember_ledger::{LedgerBinder, LedgerClient, PostRecord};
use ember_storage::{
    CertifiedBlob, StorageError, StorageReader, StorageWriter, UploadError, UploadFlow,
};
use ember_types::{AccountId, ContentAddress, RecordId, StorageHandle};

use crate::config::NetworkConfig;
use crate::error::ClientError;

/// Confirmation of a completed publish flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishReceipt {
    pub record_id: RecordId,
    pub content_address: ContentAddress,
    pub storage_handle: StorageHandle,
    /// `false` when the content was already certified on the network and
    /// the existing blob was bound instead of a new one.
    pub newly_certified: bool,
}

/// One client session: an author bound to a storage network and a ledger.
///
/// Every operation is a single logical workflow with strictly ordered
/// suspend points; nothing here holds global mutable state, so a client can
/// be shared freely behind an `Arc`.
pub struct EmberClient<S, L> {
    storage: Arc<S>,
    fetcher: Arc<ContentFetcher<S>>,
    binder: LedgerBinder<L>,
    engine: CurationEngine<L>,
    assembler: FeedAssembler<L>,
    config: NetworkConfig,
    author: AccountId,
}

impl<S, L> EmberClient<S, L>
where
    S: StorageWriter + StorageReader + Send + Sync + 'static,
    L: LedgerClient + 'static,
{
    pub fn new(
        storage: Arc<S>,
        ledger: Arc<L>,
        author: AccountId,
        registry: RecordId,
        config: NetworkConfig,
    ) -> Self {
        Self {
            fetcher: Arc::new(ContentFetcher::new(Arc::clone(&storage))),
            storage,
            binder: LedgerBinder::new(Arc::clone(&ledger), author.clone()),
            engine: CurationEngine::new(LedgerBinder::new(Arc::clone(&ledger), author.clone())),
            assembler: FeedAssembler::new(ledger, registry),
            config,
            author,
        }
    }

    /// Publish a draft: encode, run the upload flow to certification, then
    /// bind the certified blob into a new post record.
    ///
    /// A failure anywhere aborts the whole in-flight flow and surfaces one
    /// error; nothing below is silently swallowed.
    pub async fn publish(&self, draft: &PostDraft) -> Result<PublishReceipt, ClientError> {
        let canonical = encode(draft)?;
        let mut flow = UploadFlow::new(
            canonical.bytes,
            self.author.clone(),
            self.config.default_epochs,
        );
        let blob = self.run_upload(&mut flow).await?;
        let record_id = self
            .binder
            .create_record(&canonical.content.title, &blob)
            .await?;
        info!(record = %record_id, "post published");
        Ok(PublishReceipt {
            record_id,
            content_address: blob.address,
            storage_handle: blob.handle,
            newly_certified: blob.newly_certified,
        })
    }

    /// Drive the upload flow, retrying transport failures with backoff and
    /// allowing one clean restart when a registration lapses mid-flow.
    async fn run_upload(&self, flow: &mut UploadFlow) -> Result<CertifiedBlob, ClientError> {
        let policy = self.config.retry;
        let mut attempts: u32 = 0;
        let mut restarted = false;
        loop {
            attempts += 1;
            match flow.run(self.storage.as_ref()).await {
                Ok(blob) => return Ok(blob),
                Err(UploadError::Storage(StorageError::RegistrationExpired)) if !restarted => {
                    // The flow has reset itself to Encoded; re-reserve once.
                    debug!("registration lapsed; restarting upload flow");
                    restarted = true;
                    attempts = 0;
                }
                Err(UploadError::Storage(e))
                    if e.is_retryable() && policy.allows_retry(attempts) =>
                {
                    debug!(error = %e, attempt = attempts, "retryable upload failure");
                    tokio::time::sleep(policy.delay_before(attempts)).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Upvote a record, returning the reconciled authoritative state.
    pub async fn upvote(&self, record: &PostRecord) -> Result<PostRecord, ClientError> {
        Ok(self.engine.upvote(record).await?)
    }

    /// All visible post records, ordered by upvotes then recency.
    pub async fn list_posts(&self) -> Result<Vec<PostRecord>, ClientError> {
        Ok(self.assembler.list_posts().await?)
    }

    /// The ordered feed with content resolved, tombstones included.
    pub async fn feed(&self) -> Result<Vec<HydratedPost>, ClientError> {
        let records = self.list_posts().await?;
        Ok(hydrate(
            Arc::clone(&self.fetcher),
            records,
            self.config.hydration_concurrency,
        )
        .await)
    }

    /// Load one post and its content. `Ok(None)` when the id does not
    /// resolve to a record at all.
    pub async fn load_post(&self, id: &RecordId) -> Result<Option<HydratedPost>, ClientError> {
        let Some(record) = self.binder.fetch_record(id).await? else {
            return Ok(None);
        };
        let content =
            ContentState::from_fetch(self.fetcher.fetch(&record.content_address).await);
        Ok(Some(HydratedPost { record, content }))
    }
}
