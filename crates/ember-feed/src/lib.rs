//! Feed reconstruction for the Ember protocol.
//!
//! There is no server-side index: the public feed is rebuilt from ledger
//! state on every query. The [`FeedAssembler`] discovers record ids through
//! the event log and the registry's attached objects, deduplicates them,
//! drops anything that no longer parses as a record, and orders the rest by
//! upvotes then recency. The [`ContentFetcher`] resolves each record's
//! content address independently of the write path, keeping "expired" apart
//! from "broken".

pub mod assembler;
pub mod error;
pub mod fetcher;
pub mod hydrate;

pub use assembler::{FeedAssembler, EVENT_WINDOW};
pub use error::{FeedError, FetchError};
pub use fetcher::ContentFetcher;
pub use hydrate::{hydrate, ContentState, HydratedPost};
