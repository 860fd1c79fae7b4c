use tracing::debug;

use ember_ledger::{LedgerBinder, LedgerClient, PostRecord, PreconditionError};
use ember_types::EpochCount;

use crate::error::CurationError;

/// Tentative local view after a confirmed upvote: count bumped by one.
///
/// A guess, nothing more; [`reconcile`] replaces it the moment a fresh read
/// arrives.
pub fn apply_optimistic(record: &PostRecord) -> PostRecord {
    let mut updated = record.clone();
    updated.upvote_count += 1;
    updated
}

/// Merge an optimistic local record with an authoritative re-read.
///
/// The fresh read always wins; the optimistic value only survives when the
/// ledger had nothing fresher to offer (an eventual-consistency read that
/// has not caught up yet).
pub fn reconcile(optimistic: PostRecord, fresh: Option<PostRecord>) -> PostRecord {
    match fresh {
        Some(authoritative) => authoritative,
        None => optimistic,
    }
}

/// Validates and submits upvotes, keeping the caller's view of the record
/// consistent with the ledger.
///
/// Whether one account may upvote the same record repeatedly is the ledger
/// entry point's policy; this layer does not second-guess it.
pub struct CurationEngine<L> {
    binder: LedgerBinder<L>,
}

impl<L: LedgerClient> CurationEngine<L> {
    pub fn new(binder: LedgerBinder<L>) -> Self {
        Self { binder }
    }

    /// Upvote a record, extending its content's lifespan by one epoch.
    ///
    /// Fails immediately, with no transaction attempted, when the record
    /// carries no storage handle. On confirmation the local count is bumped
    /// optimistically and then overwritten by an authoritative re-read.
    pub async fn upvote(&self, record: &PostRecord) -> Result<PostRecord, CurationError> {
        if !record.can_extend() {
            return Err(PreconditionError::MissingStorageHandle.into());
        }

        self.binder
            .extend_lifespan(record, EpochCount::ONE)
            .await?;

        let optimistic = apply_optimistic(record);
        let fresh = self.binder.fetch_record(&record.id).await?;
        let reconciled = reconcile(optimistic, fresh);
        debug!(record = %reconciled.id, upvotes = reconciled.upvote_count, "upvote reconciled");
        Ok(reconciled)
    }
}
