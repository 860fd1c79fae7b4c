use async_trait::async_trait;

use ember_types::{AccountId, ContentAddress, EpochCount, StorageHandle};

use crate::error::StorageResult;
use crate::types::{CertifiedBlob, RegistrationId};

/// Write path of the storage network.
///
/// `register` and `certify` correspond to the two user-signed transactions of
/// a publish flow; how signing happens is the wallet's concern, not this
/// trait's. Implementations must keep `upload` idempotent per registration id.
#[async_trait]
pub trait StorageWriter: Send + Sync {
    /// The network's maximum retention window. Requested allocations are
    /// clamped to this before registering.
    async fn max_epochs(&self) -> StorageResult<EpochCount>;

    /// Reserve storage for `len` bytes over `epochs` epochs. Published posts
    /// always register with `deletable = false`.
    async fn register(
        &self,
        len: u64,
        epochs: EpochCount,
        deletable: bool,
        owner: &AccountId,
    ) -> StorageResult<RegistrationId>;

    /// Push blob bytes against a live registration.
    async fn upload(&self, registration: &RegistrationId, bytes: &[u8]) -> StorageResult<()>;

    /// Finalize the blob, yielding its permanent content address and the
    /// ledger-visible storage handle.
    async fn certify(&self, registration: &RegistrationId) -> StorageResult<CertifiedBlob>;

    /// Extend a certified blob's epoch allocation.
    async fn extend(&self, handle: &StorageHandle, epochs: EpochCount) -> StorageResult<()>;
}

/// Read path of the storage network.
#[async_trait]
pub trait StorageReader: Send + Sync {
    /// Resolve a content address to bytes. Absent or expired content is
    /// [`StorageError::NotFound`](crate::StorageError::NotFound); any other
    /// failure is a transport error. No retry policy is imposed here.
    async fn get(&self, address: &ContentAddress) -> StorageResult<Vec<u8>>;
}
