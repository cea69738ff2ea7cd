//! Types library for the lending protocol risk stack
//!
//! Core type definitions shared by the risk engine and the price oracle,
//! ensuring both sides agree on identities, fixed-point scales and the
//! error taxonomy.
//!
//! # Modules
//! - `ids`: Unique identifiers (AccountId, MarketId, AssetId, EngineId)
//! - `numeric`: Fixed-point mantissa types (Exp, InternalPrice, UnderlyingPrice)
//! - `market`: Market registry records and classifications
//! - `risk`: Balance snapshots and liquidity results
//! - `access`: Admin and guardian roles
//! - `price`: The `PriceSource` seam
//! - `errors`: Error taxonomy

pub mod ids;
pub mod numeric;
pub mod market;
pub mod risk;
pub mod access;
pub mod price;
pub mod errors;

pub use price::PriceSource;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::access::*;
    pub use crate::errors::*;
    pub use crate::ids::*;
    pub use crate::market::*;
    pub use crate::numeric::*;
    pub use crate::price::*;
    pub use crate::risk::*;
}
