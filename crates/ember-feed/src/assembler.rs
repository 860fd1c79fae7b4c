use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, warn};

use ember_ledger::{LedgerClient, LedgerError, PostRecord};
use ember_types::RecordId;

use crate::error::FeedError;

/// How far back the event-log discovery strategy scans.
pub const EVENT_WINDOW: usize = 500;

/// Reconstructs the public feed from ledger state.
///
/// Candidate ids come from two independent strategies — a bounded scan of
/// historical publish events, and an enumeration of the registry object's
/// attached records — unioned with set semantics so a record discovered both
/// ways appears once. Ids that no longer resolve to a valid record are
/// skipped, not fatal. Discovery is only an error when every strategy fails;
/// one working strategy carries the feed.
pub struct FeedAssembler<L> {
    ledger: Arc<L>,
    registry: RecordId,
    event_window: usize,
}

impl<L: LedgerClient> FeedAssembler<L> {
    pub fn new(ledger: Arc<L>, registry: RecordId) -> Self {
        Self {
            ledger,
            registry,
            event_window: EVENT_WINDOW,
        }
    }

    pub fn with_event_window(mut self, window: usize) -> Self {
        self.event_window = window;
        self
    }

    /// Discover, fetch, filter, and order every visible post record.
    pub async fn list_posts(&self) -> Result<Vec<PostRecord>, FeedError> {
        let ids = self.discover().await?;
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            match self.resolve(&id).await {
                Some(record) => records.push(record),
                None => debug!(record = %id, "skipping unresolvable record"),
            }
        }
        records.sort_by(feed_order);
        Ok(records)
    }

    /// Union of both discovery strategies, deduplicated.
    async fn discover(&self) -> Result<BTreeSet<RecordId>, FeedError> {
        let mut ids = BTreeSet::new();
        let mut last_failure: Option<LedgerError> = None;
        let mut succeeded = false;

        match self.ledger.query_events(self.event_window).await {
            Ok(events) => {
                succeeded = true;
                ids.extend(events.into_iter().map(|e| e.record_id));
            }
            Err(e) => {
                warn!(error = %e, "event-log discovery failed");
                last_failure = Some(e);
            }
        }

        match self.ledger.get_dynamic_fields(&self.registry).await {
            Ok(attached) => {
                succeeded = true;
                ids.extend(attached);
            }
            Err(e) => {
                warn!(error = %e, "registry discovery failed");
                last_failure = Some(e);
            }
        }

        match (succeeded, last_failure) {
            (true, _) => Ok(ids),
            (false, Some(e)) => Err(FeedError::Discovery(e)),
            // Unreachable: no failure implies at least one success.
            (false, None) => Ok(ids),
        }
    }

    /// Fetch one id and parse it, treating every failure as a skip.
    async fn resolve(&self, id: &RecordId) -> Option<PostRecord> {
        let value = self.ledger.get_object(id).await.ok()??;
        PostRecord::from_value(&value).ok()
    }
}

/// Total feed order: upvotes descending, then creation time descending, then
/// id for determinism between otherwise identical records.
fn feed_order(a: &PostRecord, b: &PostRecord) -> Ordering {
    b.upvote_count
        .cmp(&a.upvote_count)
        .then(b.created_at.cmp(&a.created_at))
        .then(a.id.cmp(&b.id))
}
