use serde::{Deserialize, Serialize};
use tracing::debug;

use ember_types::{AccountId, EpochCount};

use crate::error::{StorageError, StorageResult};
use crate::traits::StorageWriter;
use crate::types::{CertifiedBlob, RegistrationId};

/// Where a publish attempt stands.
///
/// The phase is plain data, serializable on purpose: a user can abandon a
/// flow between the two signing steps, and resumption is a property of this
/// value rather than of any UI lifecycle. Identity across attempts is the
/// BLAKE3 digest of the canonical bytes, so restarting an abandoned flow
/// with the same content converges on the same blob.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadPhase {
    /// Holding canonical bytes, nothing prepared yet.
    Init,
    /// Bytes vetted and staged for transfer.
    Encoded,
    /// Storage reserved; holds the registration confirmation id.
    Registered { registration: RegistrationId },
    /// Bytes pushed against the registration.
    Uploaded { registration: RegistrationId },
    /// Blob finalized with a permanent address and extension handle.
    Certified { blob: CertifiedBlob },
}

impl UploadPhase {
    fn name(&self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::Encoded => "Encoded",
            Self::Registered { .. } => "Registered",
            Self::Uploaded { .. } => "Uploaded",
            Self::Certified { .. } => "Certified",
        }
    }
}

/// Errors of the publish state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    /// The canonical bytes are unusable. Fatal, never retried.
    #[error("malformed canonical bytes: {0}")]
    Malformed(String),

    /// A transition was attempted out of order. The register/upload/certify
    /// ordering is a hard dependency, not a convenience pipeline.
    #[error("phase {found} cannot {attempted}; requires {expected}")]
    OutOfOrder {
        attempted: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Four-phase blob publish flow: encode, register, upload, certify.
///
/// Each transition is gated by one external call and advances only on that
/// call's success; a failure leaves the flow in its prior phase. The two
/// signed transactions (register and certify) are the user-authorization
/// points. A certify attempt against a lapsed registration resets the flow
/// to `Encoded` so the caller restarts with a fresh reservation; the content
/// digest makes that restart idempotent.
pub struct UploadFlow {
    bytes: Vec<u8>,
    digest: [u8; 32],
    owner: AccountId,
    epochs: EpochCount,
    phase: UploadPhase,
}

impl UploadFlow {
    /// Start a flow over canonical bytes, requesting `epochs` of retention.
    /// The request is clamped to the network maximum at registration time.
    pub fn new(bytes: Vec<u8>, owner: AccountId, epochs: EpochCount) -> Self {
        let digest = *blake3::hash(&bytes).as_bytes();
        Self {
            bytes,
            digest,
            owner,
            epochs,
            phase: UploadPhase::Init,
        }
    }

    /// Rebuild a flow from a persisted phase, e.g. after the user walked away
    /// between signing steps. The phase must have come from a flow over the
    /// same canonical bytes.
    pub fn resume(
        bytes: Vec<u8>,
        owner: AccountId,
        epochs: EpochCount,
        phase: UploadPhase,
    ) -> Self {
        let digest = *blake3::hash(&bytes).as_bytes();
        Self {
            bytes,
            digest,
            owner,
            epochs,
            phase,
        }
    }

    pub fn phase(&self) -> &UploadPhase {
        &self.phase
    }

    /// Content identity of this flow, stable across restarts.
    pub fn digest(&self) -> &[u8; 32] {
        &self.digest
    }

    pub fn is_certified(&self) -> bool {
        matches!(self.phase, UploadPhase::Certified { .. })
    }

    /// The certified blob, once the flow has completed.
    pub fn certified(&self) -> Option<&CertifiedBlob> {
        match &self.phase {
            UploadPhase::Certified { blob } => Some(blob),
            _ => None,
        }
    }

    fn out_of_order(
        &self,
        attempted: &'static str,
        expected: &'static str,
    ) -> UploadError {
        UploadError::OutOfOrder {
            attempted,
            expected,
            found: self.phase.name(),
        }
    }

    /// `Init -> Encoded`: vet and stage the canonical bytes locally.
    pub fn prepare(&mut self) -> Result<(), UploadError> {
        if self.phase != UploadPhase::Init {
            return Err(self.out_of_order("prepare", "Init"));
        }
        if self.bytes.is_empty() {
            return Err(UploadError::Malformed("empty byte sequence".into()));
        }
        self.phase = UploadPhase::Encoded;
        Ok(())
    }

    /// `Encoded -> Registered`: request the signed register transaction.
    ///
    /// On failure the flow stays `Encoded`; the caller may retry with a
    /// fresh register transaction. A confirmation id is required before any
    /// upload proceeds.
    pub async fn register<W: StorageWriter + ?Sized>(
        &mut self,
        writer: &W,
    ) -> Result<(), UploadError> {
        if self.phase != UploadPhase::Encoded {
            return Err(self.out_of_order("register", "Encoded"));
        }
        let max = writer.max_epochs().await?;
        let epochs = self.epochs.clamp_to(max);
        let registration = writer
            .register(self.bytes.len() as u64, epochs, false, &self.owner)
            .await?;
        debug!(%registration, %epochs, "flow registered");
        self.phase = UploadPhase::Registered { registration };
        Ok(())
    }

    /// `Registered -> Uploaded`: push bytes against the registration.
    ///
    /// Upload is idempotent per confirmation id, so transport failures are
    /// retryable in place. A lapsed registration drops the flow back to
    /// `Encoded` since no retry against that id can succeed.
    pub async fn upload<W: StorageWriter + ?Sized>(
        &mut self,
        writer: &W,
    ) -> Result<(), UploadError> {
        let registration = match &self.phase {
            UploadPhase::Registered { registration } => registration.clone(),
            _ => return Err(self.out_of_order("upload", "Registered")),
        };
        match writer.upload(&registration, &self.bytes).await {
            Ok(()) => {
                self.phase = UploadPhase::Uploaded { registration };
                Ok(())
            }
            Err(StorageError::RegistrationExpired) => {
                self.phase = UploadPhase::Encoded;
                Err(StorageError::RegistrationExpired.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// `Uploaded -> Certified`: request the signed certify transaction.
    ///
    /// Success yields the permanent content address and storage handle. If
    /// the registration expired while awaiting the signature, the flow
    /// resets to `Encoded` and the whole reserve/upload sequence restarts.
    pub async fn certify<W: StorageWriter + ?Sized>(
        &mut self,
        writer: &W,
    ) -> Result<&CertifiedBlob, UploadError> {
        let registration = match &self.phase {
            UploadPhase::Uploaded { registration } => registration.clone(),
            _ => return Err(self.out_of_order("certify", "Uploaded")),
        };
        match writer.certify(&registration).await {
            Ok(blob) => {
                debug!(address = %blob.address.short(), "flow certified");
                self.phase = UploadPhase::Certified { blob };
                match &self.phase {
                    UploadPhase::Certified { blob } => Ok(blob),
                    _ => unreachable!("phase was just set to Certified"),
                }
            }
            Err(StorageError::RegistrationExpired) => {
                self.phase = UploadPhase::Encoded;
                Err(StorageError::RegistrationExpired.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Drive one full pass through the remaining phases.
    ///
    /// Picks up wherever the flow stands, so a resumed flow repeats nothing
    /// it already completed. Backoff and restart policy live at the call
    /// site.
    pub async fn run<W: StorageWriter + ?Sized>(
        &mut self,
        writer: &W,
    ) -> Result<CertifiedBlob, UploadError> {
        if self.phase == UploadPhase::Init {
            self.prepare()?;
        }
        if self.phase == UploadPhase::Encoded {
            self.register(writer).await?;
        }
        if matches!(self.phase, UploadPhase::Registered { .. }) {
            self.upload(writer).await?;
        }
        if matches!(self.phase, UploadPhase::Uploaded { .. }) {
            self.certify(writer).await?;
        }
        match &self.phase {
            UploadPhase::Certified { blob } => Ok(blob.clone()),
            phase => Err(UploadError::OutOfOrder {
                attempted: "run",
                expected: "Certified",
                found: phase.name(),
            }),
        }
    }
}
