use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch.
///
/// Post records carry a ledger-assigned creation timestamp; this type only
/// transports and compares those values. [`TimestampMs::now`] exists for the
/// in-memory ledger, which plays the ledger's role in tests.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TimestampMs(u64);

impl TimestampMs {
    pub const fn new(millis: u64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Wall-clock now. Used only where this process stands in for the ledger.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self(millis)
    }

    /// Milliseconds elapsed between this timestamp and a later one.
    pub fn millis_until(self, later: TimestampMs) -> u64 {
        later.0.saturating_sub(self.0)
    }
}

impl fmt::Display for TimestampMs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

impl From<u64> for TimestampMs {
    fn from(millis: u64) -> Self {
        Self(millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_time() {
        assert!(TimestampMs::new(1_000) < TimestampMs::new(2_000));
    }

    #[test]
    fn millis_until_saturates() {
        let later = TimestampMs::new(500);
        let earlier = TimestampMs::new(1_500);
        assert_eq!(earlier.millis_until(later), 0);
        assert_eq!(later.millis_until(earlier), 1_000);
    }

    #[test]
    fn now_is_nonzero() {
        assert!(TimestampMs::now().as_millis() > 0);
    }
}
