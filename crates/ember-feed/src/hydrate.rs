use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

use ember_content::PostContent;
use ember_ledger::PostRecord;
use ember_storage::StorageReader;

use crate::error::FetchError;
use crate::fetcher::ContentFetcher;

/// What came back when a record's content address was resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentState {
    Available(PostContent),
    /// The storage network has forgotten the bytes. The record remains a
    /// tombstone: metadata displays, the body does not.
    Expired,
    Failed(FetchError),
}

/// A feed entry joined with its storage-side content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HydratedPost {
    pub record: PostRecord,
    pub content: ContentState,
}

impl ContentState {
    /// Classify one fetch result: `NotFound` is a tombstone, anything else
    /// that failed is a fault.
    pub fn from_fetch(result: Result<PostContent, FetchError>) -> Self {
        match result {
            Ok(content) => Self::Available(content),
            Err(FetchError::NotFound) => Self::Expired,
            Err(e) => Self::Failed(e),
        }
    }
}

impl HydratedPost {
    pub fn is_available(&self) -> bool {
        matches!(self.content, ContentState::Available(_))
    }
}

/// Resolve content for a batch of records, at most `concurrency` fetches in
/// flight at once.
///
/// The fetches are independent reads with no shared mutable state, so they
/// fan out freely; the bound keeps a large feed from overwhelming the
/// storage network's read path. Output order matches input order.
pub async fn hydrate<R>(
    fetcher: Arc<ContentFetcher<R>>,
    records: Vec<PostRecord>,
    concurrency: usize,
) -> Vec<HydratedPost>
where
    R: StorageReader + Send + Sync + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    let total = records.len();
    for (slot, record) in records.into_iter().enumerate() {
        let fetcher = Arc::clone(&fetcher);
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = semaphore.acquire().await.expect("semaphore never closed");
            let content = ContentState::from_fetch(fetcher.fetch(&record.content_address).await);
            if content == ContentState::Expired {
                debug!(record = %record.id, "content expired; keeping tombstone");
            }
            (slot, HydratedPost { record, content })
        });
    }

    let mut slots: Vec<Option<HydratedPost>> = (0..total).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        let (slot, post) = joined.expect("hydration task panicked");
        slots[slot] = Some(post);
    }
    slots
        .into_iter()
        .map(|slot| slot.expect("every slot is filled exactly once"))
        .collect()
}
