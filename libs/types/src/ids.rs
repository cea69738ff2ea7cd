//! Unique identifier types for protocol entities
//!
//! All IDs wrap a UUID v7. The nil UUID plays the role of the "zero
//! identity": it is never issued by `new()` and configuration validation
//! rejects it wherever a real identity is required.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new identifier with the current timestamp
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// The zero identity
            pub const fn zero() -> Self {
                Self(Uuid::nil())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0.is_nil()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Identity of an account (borrower, supplier, liquidator, admin)
    AccountId
);

uuid_id!(
    /// Identity of a lending market (the market token, not its underlying)
    MarketId
);

uuid_id!(
    /// Identity of an underlying asset priced by the oracle
    AssetId
);

uuid_id!(
    /// Identity of a risk engine instance.
    ///
    /// Seizing collateral is only allowed between markets governed by the
    /// same engine.
    EngineId
);
