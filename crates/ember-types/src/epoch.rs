use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage-network retention measured in epochs.
///
/// An epoch is the storage network's time unit; unextended content becomes
/// eligible for removal once its allocated epochs elapse. Every confirmed
/// upvote adds exactly one epoch.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EpochCount(u32);

impl EpochCount {
    /// One epoch: the amount added per confirmed upvote.
    pub const ONE: Self = Self(1);

    pub const fn new(epochs: u32) -> Self {
        Self(epochs)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Clamp a requested allocation to the network's maximum retention window.
    pub fn clamp_to(self, max: EpochCount) -> Self {
        Self(self.0.min(max.0))
    }

    pub fn saturating_add(self, other: EpochCount) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for EpochCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for EpochCount {
    fn from(epochs: u32) -> Self {
        Self(epochs)
    }
}
