//! High-level SDK for the Ember protocol.
//!
//! [`EmberClient`] wires the lower crates into the four operations a front
//! end needs: publish a post, upvote a post, list the feed, and load one
//! post with its content. The client is generic over the storage and ledger
//! boundaries; production wiring points it at network-backed
//! implementations, tests at the in-memory ones.

pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod retry;

pub use client::{EmberClient, PublishReceipt};
pub use config::NetworkConfig;
pub use error::ClientError;
pub use format::format_age;
pub use retry::RetryPolicy;
