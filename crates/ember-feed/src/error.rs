use ember_ledger::LedgerError;

/// Content resolution failures, kept distinct so callers can render each
/// state differently.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The storage network no longer holds the bytes (expired) or never
    /// certified them. Benign: the record displays as metadata only.
    #[error("content is expired or was never stored")]
    NotFound,

    /// Any other transport failure on the read path. Retry policy is the
    /// caller's decision.
    #[error("content fetch failed: {0}")]
    Transport(String),

    /// Bytes arrived but did not parse as post content. Distinct from a
    /// fetch failure by design.
    #[error("content did not parse: {0}")]
    Malformed(String),

    /// Bytes arrived but do not match the digest embedded in the address.
    #[error("fetched bytes do not match the content address digest")]
    IntegrityMismatch,
}

/// Feed assembly failures.
///
/// Discovery failures used to degrade to a silent empty feed; they are a
/// typed error now so callers can tell "no posts" from "discovery broke".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    #[error("record discovery failed: {0}")]
    Discovery(#[from] LedgerError),
}
