//! Foundation types for the Ember publish/curate protocol.
//!
//! This crate provides the identifier and temporal types used throughout the
//! Ember system. Every other Ember crate depends on `ember-types`.
//!
//! # Key Types
//!
//! - [`ContentAddress`] — opaque identifier by which storage-network bytes are retrieved
//! - [`StorageHandle`] — ledger-visible reference wrapping a stored blob
//! - [`RecordId`] — ledger object identifier of a post record
//! - [`AccountId`] — ledger account identifier of an author
//! - [`EpochCount`] — storage-network retention measured in epochs
//! - [`TimestampMs`] — milliseconds since the Unix epoch, ledger-assigned

pub mod address;
pub mod epoch;
pub mod error;
pub mod ids;
pub mod time;

pub use address::ContentAddress;
pub use epoch::EpochCount;
pub use error::TypeError;
pub use ids::{AccountId, RecordId, StorageHandle};
pub use time::TimestampMs;
