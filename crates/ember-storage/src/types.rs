use std::fmt;

use serde::{Deserialize, Serialize};

use ember_types::{ContentAddress, StorageHandle};

/// Confirmation identifier issued by a successful register transaction.
///
/// Uploads and certification reference the reservation through this id.
/// A registration is only valid for a bounded window; past it the flow
/// restarts from its encoded bytes.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationId(String);

impl RegistrationId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegistrationId({})", self.0)
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of certifying an uploaded blob: its permanent content address and
/// the ledger-visible handle used for lifespan extension.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertifiedBlob {
    pub address: ContentAddress,
    pub handle: StorageHandle,
    /// `false` when identical content was already certified on the network,
    /// in which case `address` and `handle` refer to the existing blob.
    pub newly_certified: bool,
}
