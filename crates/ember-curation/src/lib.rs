//! Upvote-driven curation for the Ember protocol.
//!
//! An upvote is the community's way of paying for a post's continued
//! existence: one confirmed upvote buys one more epoch of storage. The
//! [`CurationEngine`] validates that extension is possible, submits the
//! transaction through the ledger binder, applies an optimistic local count
//! bump, and then reconciles against an authoritative re-read — the fresh
//! read always wins.

pub mod engine;
pub mod error;

pub use engine::{apply_optimistic, reconcile, CurationEngine};
pub use error::CurationError;
