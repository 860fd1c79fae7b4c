use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Opaque identifier by which storage-network bytes are retrieved.
///
/// The storage network issues the address at certification time and the
/// client treats it as an opaque token. Addresses minted by the in-process
/// storage node are the hex-encoded BLAKE3 digest of the blob bytes, which
/// lets readers verify fetched content against the address; addresses issued
/// by external networks carry no such structure and are trusted as-is.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentAddress(String);

impl ContentAddress {
    /// Wrap an externally-issued address without interpreting it.
    pub fn new(raw: impl Into<String>) -> Result<Self, TypeError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(TypeError::EmptyIdentifier("content address"));
        }
        Ok(Self(raw))
    }

    /// Derive the address for a blob, as the in-process storage node mints it.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(hex::encode(blake3::hash(data).as_bytes()))
    }

    /// The raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The embedded content digest, if the address is digest-shaped.
    ///
    /// Returns `Some` only for 64-character hex addresses; opaque addresses
    /// from external networks return `None` and cannot be verified.
    pub fn digest(&self) -> Option<[u8; 32]> {
        if self.0.len() != 64 {
            return None;
        }
        let bytes = hex::decode(&self.0).ok()?;
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Some(arr)
    }

    /// Short form for log output (first 8 characters, or the whole address).
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl fmt::Debug for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentAddress({})", self.short())
    }
}

impl fmt::Display for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
