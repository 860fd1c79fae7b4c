use ember_ledger::{BinderError, LedgerError, PreconditionError};

/// Errors of the curation engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CurationError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl From<BinderError> for CurationError {
    fn from(err: BinderError) -> Self {
        match err {
            BinderError::Precondition(e) => Self::Precondition(e),
            BinderError::Ledger(e) => Self::Ledger(e),
        }
    }
}
