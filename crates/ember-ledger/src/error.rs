/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The transaction was rejected: insufficient authorization, malformed
    /// arguments, or ledger-side validation. Surfaced to the user verbatim;
    /// retryable only by re-initiating the whole flow.
    #[error("ledger rejected the transaction: {0}")]
    Rejected(String),

    /// An object payload did not parse as a post record.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// Transport-level failure talking to the ledger.
    #[error("ledger transport failure: {0}")]
    Transport(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Required linkage is missing. Never retried without the caller correcting
/// state first; no transaction is attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionError {
    /// The record predates storage handles and cannot have its lifespan
    /// extended. Its metadata still displays.
    #[error("record has no storage handle; lifespan extension is unavailable")]
    MissingStorageHandle,
}
