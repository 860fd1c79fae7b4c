use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

macro_rules! opaque_id {
    ($(#[$doc:meta])* $name:ident, $label:literal) => {
        $(#[$doc])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Result<Self, TypeError> {
                let raw = raw.into();
                if raw.is_empty() {
                    return Err(TypeError::EmptyIdentifier($label));
                }
                Ok(Self(raw))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

opaque_id!(
    /// Ledger object identifier of a post record, assigned at creation.
    RecordId,
    "record id"
);

opaque_id!(
    /// Ledger account identifier of a post author.
    AccountId,
    "account id"
);

opaque_id!(
    /// Ledger-visible reference object wrapping a storage-network blob.
    ///
    /// Required to submit lifespan-extension calls. Records created before
    /// this field existed have no handle and cannot be extended.
    StorageHandle,
    "storage handle"
);
