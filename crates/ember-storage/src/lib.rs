//! Storage-network boundary for the Ember protocol.
//!
//! Bulk post content lives on a content-addressed, epoch-expiring storage
//! network. This crate defines the write path ([`StorageWriter`]: register,
//! upload, certify, extend) and read path ([`StorageReader`]: get), the
//! four-phase publish state machine ([`UploadFlow`]), and an in-process node
//! ([`InMemoryStorageNode`]) with full epoch accounting for tests and
//! embedding.
//!
//! # Design Rules
//!
//! 1. Certified blobs are immutable; the network only ever forgets them.
//! 2. Upload is idempotent per registration id.
//! 3. Certification never succeeds without a completed upload, and upload
//!    never proceeds without a live registration. The phase machine enforces
//!    this ordering locally; the node enforces it again remotely.
//! 4. Expired content reads as [`StorageError::NotFound`], which is benign:
//!    the ledger record outlives the bytes.

pub mod error;
pub mod memory;
pub mod traits;
pub mod types;
pub mod upload;

pub use error::{StorageError, StorageResult};
pub use memory::{InMemoryStorageNode, REGISTRATION_TTL_EPOCHS};
pub use traits::{StorageReader, StorageWriter};
pub use types::{CertifiedBlob, RegistrationId};
pub use upload::{UploadError, UploadFlow, UploadPhase};
