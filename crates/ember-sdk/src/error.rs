use ember_content::ValidationError;
use ember_curation::CurationError;
use ember_feed::{FeedError, FetchError};
use ember_ledger::{BinderError, LedgerError, PreconditionError};
use ember_storage::UploadError;

/// Unified error surface of the SDK.
///
/// Each variant keeps its layer's taxonomy intact: validation failures are
/// never retried, precondition failures need the caller to fix state first,
/// ledger rejections surface verbatim, and a `NotFound` fetch is a benign
/// "content unavailable", not a fault.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl From<BinderError> for ClientError {
    fn from(err: BinderError) -> Self {
        match err {
            BinderError::Precondition(e) => Self::Precondition(e),
            BinderError::Ledger(e) => Self::Ledger(e),
        }
    }
}

impl From<CurationError> for ClientError {
    fn from(err: CurationError) -> Self {
        match err {
            CurationError::Precondition(e) => Self::Precondition(e),
            CurationError::Ledger(e) => Self::Ledger(e),
        }
    }
}
