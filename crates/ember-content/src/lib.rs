//! Post content packaging for the Ember protocol.
//!
//! A [`PostDraft`] is what the user typed; validation turns it into a
//! [`PostContent`], the immutable JSON wire shape stored on the network; and
//! [`encode`] produces the deterministic byte sequence that is uploaded.
//! Identical input always yields byte-identical output, which is what makes
//! abandoned publish flows safely restartable: re-encoding the same draft
//! re-derives the same content address.
//!
//! There is no update path. A correction is a new post.

pub mod content;
pub mod draft;
pub mod encode;
pub mod error;

pub use content::{ImagePayload, PostContent, MAX_IMAGES};
pub use draft::{PostDraft, MAX_TITLE_CODE_POINTS};
pub use encode::{encode, CanonicalPost};
pub use error::ValidationError;
