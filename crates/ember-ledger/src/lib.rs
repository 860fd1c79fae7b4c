//! Ledger boundary for the Ember protocol.
//!
//! The ledger holds the small authoritative record of every post: identity,
//! title, the certified blob's content address, the storage handle used for
//! lifespan extension, the author, a ledger-assigned timestamp, and the
//! upvote count. This crate defines that record ([`PostRecord`]) and its wire
//! shape ([`RecordFields`]), the client boundary ([`LedgerClient`]), the
//! transaction builder ([`LedgerBinder`]), and an in-memory ledger
//! ([`InMemoryLedger`]) whose upvote entry point extends the referenced blob
//! atomically, the way the on-chain contract does.
//!
//! Both entry points are single ledger transactions: no partial-apply state
//! exists at this layer. The off-ledger steps preceding `publish` are the
//! upload flow's problem.

pub mod binder;
pub mod error;
pub mod memory;
pub mod record;
pub mod traits;

pub use binder::{BinderError, LedgerBinder};
pub use error::{LedgerError, LedgerResult, PreconditionError};
pub use memory::InMemoryLedger;
pub use record::{PostRecord, RecordFields, UNTITLED};
pub use traits::{LedgerClient, PublishCall, PublishEvent};
