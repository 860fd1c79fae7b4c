use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use ember_types::{AccountId, ContentAddress, EpochCount, StorageHandle};

use crate::error::{StorageError, StorageResult};
use crate::traits::{StorageReader, StorageWriter};
use crate::types::{CertifiedBlob, RegistrationId};

/// Epochs a registration stays usable after it is issued.
pub const REGISTRATION_TTL_EPOCHS: u64 = 1;

/// Default maximum retention window, in epochs.
const DEFAULT_MAX_EPOCHS: u32 = 53;

struct Registration {
    len: u64,
    epochs: EpochCount,
    #[allow(dead_code)]
    owner: AccountId,
    registered_at: u64,
    bytes: Option<Vec<u8>>,
}

struct StoredBlob {
    bytes: Vec<u8>,
    expires_at: u64,
    handle: StorageHandle,
}

#[derive(Default)]
struct NodeState {
    current_epoch: u64,
    next_id: u64,
    registrations: HashMap<String, Registration>,
    blobs: HashMap<ContentAddress, StoredBlob>,
    handles: HashMap<StorageHandle, ContentAddress>,
}

/// In-memory storage node with full epoch accounting.
///
/// Intended for tests and embedding. The node mints digest-shaped content
/// addresses, enforces registration expiry, and forgets content whose epoch
/// allocation has elapsed, so client code exercises the same failure surface
/// it meets against a real network. Epochs only advance when a test calls
/// [`advance_epochs`](Self::advance_epochs).
pub struct InMemoryStorageNode {
    max_epochs: EpochCount,
    state: RwLock<NodeState>,
}

impl InMemoryStorageNode {
    pub fn new() -> Self {
        Self::with_max_epochs(EpochCount::new(DEFAULT_MAX_EPOCHS))
    }

    pub fn with_max_epochs(max_epochs: EpochCount) -> Self {
        Self {
            max_epochs,
            state: RwLock::new(NodeState::default()),
        }
    }

    /// The node's current epoch.
    pub fn current_epoch(&self) -> u64 {
        self.state.read().expect("lock poisoned").current_epoch
    }

    /// Advance the clock by `n` epochs.
    pub fn advance_epochs(&self, n: u64) {
        let mut state = self.state.write().expect("lock poisoned");
        state.current_epoch += n;
    }

    /// Epochs left before the handle's blob expires. `None` for unknown
    /// handles.
    pub fn remaining_epochs(&self, handle: &StorageHandle) -> Option<EpochCount> {
        let state = self.state.read().expect("lock poisoned");
        let address = state.handles.get(handle)?;
        let blob = state.blobs.get(address)?;
        Some(EpochCount::new(
            blob.expires_at.saturating_sub(state.current_epoch) as u32,
        ))
    }

    /// Whether the address currently resolves (certified and unexpired).
    pub fn contains(&self, address: &ContentAddress) -> bool {
        let state = self.state.read().expect("lock poisoned");
        state
            .blobs
            .get(address)
            .is_some_and(|blob| blob.expires_at > state.current_epoch)
    }

    fn registration_live(registration: &Registration, current_epoch: u64) -> bool {
        current_epoch <= registration.registered_at + REGISTRATION_TTL_EPOCHS
    }
}

impl Default for InMemoryStorageNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageWriter for InMemoryStorageNode {
    async fn max_epochs(&self) -> StorageResult<EpochCount> {
        Ok(self.max_epochs)
    }

    async fn register(
        &self,
        len: u64,
        epochs: EpochCount,
        deletable: bool,
        owner: &AccountId,
    ) -> StorageResult<RegistrationId> {
        if len == 0 {
            return Err(StorageError::Rejected("empty blob".into()));
        }
        if epochs.is_zero() {
            return Err(StorageError::Rejected("zero-epoch registration".into()));
        }
        if epochs > self.max_epochs {
            return Err(StorageError::Rejected(format!(
                "requested {epochs} epochs; the maximum retention window is {}",
                self.max_epochs
            )));
        }
        if deletable {
            return Err(StorageError::Rejected(
                "this node provisions only permanent blobs".into(),
            ));
        }

        let mut state = self.state.write().expect("lock poisoned");
        state.next_id += 1;
        let id = RegistrationId::new(format!("reg-{:04}", state.next_id));
        let registered_at = state.current_epoch;
        state.registrations.insert(
            id.as_str().to_string(),
            Registration {
                len,
                epochs,
                owner: owner.clone(),
                registered_at,
                bytes: None,
            },
        );
        debug!(registration = %id, len, %epochs, "storage reserved");
        Ok(id)
    }

    async fn upload(&self, registration: &RegistrationId, bytes: &[u8]) -> StorageResult<()> {
        let mut state = self.state.write().expect("lock poisoned");
        let current_epoch = state.current_epoch;
        let reg = state
            .registrations
            .get_mut(registration.as_str())
            .ok_or_else(|| StorageError::UnknownRegistration(registration.to_string()))?;

        if !Self::registration_live(reg, current_epoch) {
            return Err(StorageError::RegistrationExpired);
        }
        if bytes.len() as u64 != reg.len {
            return Err(StorageError::LengthMismatch {
                expected: reg.len,
                actual: bytes.len() as u64,
            });
        }
        match &reg.bytes {
            // Idempotent per registration id.
            Some(existing) if existing == bytes => Ok(()),
            Some(_) => Err(StorageError::Rejected(
                "conflicting upload for registration".into(),
            )),
            None => {
                reg.bytes = Some(bytes.to_vec());
                Ok(())
            }
        }
    }

    async fn certify(&self, registration: &RegistrationId) -> StorageResult<CertifiedBlob> {
        let mut state = self.state.write().expect("lock poisoned");
        let current_epoch = state.current_epoch;
        let reg = state
            .registrations
            .get(registration.as_str())
            .ok_or_else(|| StorageError::UnknownRegistration(registration.to_string()))?;

        if !Self::registration_live(reg, current_epoch) {
            state.registrations.remove(registration.as_str());
            return Err(StorageError::RegistrationExpired);
        }
        let bytes = reg
            .bytes
            .clone()
            .ok_or_else(|| StorageError::CertifyWithoutUpload(registration.to_string()))?;
        let epochs = reg.epochs;
        state.registrations.remove(registration.as_str());

        let address = ContentAddress::from_bytes(&bytes);
        if let Some(existing) = state.blobs.get(&address) {
            if existing.expires_at > current_epoch {
                // Identical content already certified; hand back the live blob.
                debug!(address = %address.short(), "blob already certified");
                return Ok(CertifiedBlob {
                    address,
                    handle: existing.handle.clone(),
                    newly_certified: false,
                });
            }
        }

        state.next_id += 1;
        let handle = StorageHandle::new(format!("0xblob{:04}", state.next_id))
            .map_err(|e| StorageError::Rejected(e.to_string()))?;
        let expires_at = current_epoch + u64::from(epochs.get());
        state.handles.insert(handle.clone(), address.clone());
        state.blobs.insert(
            address.clone(),
            StoredBlob {
                bytes,
                expires_at,
                handle: handle.clone(),
            },
        );
        debug!(address = %address.short(), %handle, expires_at, "blob certified");
        Ok(CertifiedBlob {
            address,
            handle,
            newly_certified: true,
        })
    }

    async fn extend(&self, handle: &StorageHandle, epochs: EpochCount) -> StorageResult<()> {
        let mut state = self.state.write().expect("lock poisoned");
        let current_epoch = state.current_epoch;
        let max_ahead = current_epoch + u64::from(self.max_epochs.get());
        let address = state
            .handles
            .get(handle)
            .cloned()
            .ok_or_else(|| StorageError::UnknownHandle(handle.to_string()))?;
        let blob = state
            .blobs
            .get_mut(&address)
            .ok_or_else(|| StorageError::UnknownHandle(handle.to_string()))?;

        // Allocation can never reach further ahead than the maximum window.
        blob.expires_at = (blob.expires_at + u64::from(epochs.get())).min(max_ahead);
        debug!(%handle, %epochs, expires_at = blob.expires_at, "allocation extended");
        Ok(())
    }
}

#[async_trait]
impl StorageReader for InMemoryStorageNode {
    async fn get(&self, address: &ContentAddress) -> StorageResult<Vec<u8>> {
        let state = self.state.read().expect("lock poisoned");
        match state.blobs.get(address) {
            // Expired blobs stay on the books but no longer resolve.
            Some(blob) if blob.expires_at > state.current_epoch => Ok(blob.bytes.clone()),
            _ => Err(StorageError::NotFound),
        }
    }
}
