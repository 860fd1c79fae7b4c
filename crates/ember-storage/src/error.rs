/// Errors produced by storage-network operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The address is absent: expired, pruned, or never certified.
    /// Expected and benign; callers render it as "content unavailable",
    /// not as a generic failure.
    #[error("content not found on the storage network")]
    NotFound,

    #[error("unknown registration: {0}")]
    UnknownRegistration(String),

    /// The registration's reservation window has lapsed. The publish flow
    /// must restart from its encoded bytes with a fresh registration.
    #[error("registration has expired")]
    RegistrationExpired,

    #[error("no uploaded bytes for registration {0}; certify requires a completed upload")]
    CertifyWithoutUpload(String),

    #[error("uploaded {actual} bytes against a registration for {expected}")]
    LengthMismatch { expected: u64, actual: u64 },

    #[error("unknown storage handle: {0}")]
    UnknownHandle(String),

    /// The network rejected the request outright. Not retryable as-is.
    #[error("storage network rejected the request: {0}")]
    Rejected(String),

    /// Transport-level failure. Retryable with backoff at the call site.
    #[error("storage transport failure: {0}")]
    Transport(String),
}

impl StorageError {
    /// Whether a retry of the same call can plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
