//! Price Oracle Service
//!
//! Per-asset configuration store plus a query that returns a normalized,
//! confidence-adjusted price for a market's underlying asset.
//!
//! # Architecture
//!
//! ```text
//!  Deterministic feed      Probabilistic feed
//!  (answer, decimals)      (price ± conf, expo)
//!         │                        │
//!   ┌─────▼──────┐          ┌──────▼───────┐
//!   │ normalize  │          │ normalize    │
//!   │ freshness  │          │ freshness    │
//!   └─────┬──────┘          │ confidence   │
//!         │                 └──────┬───────┘
//!         └────────┬───────────────┘
//!            ┌─────▼─────┐
//!            │  select   │  ← strictly newer wins
//!            └─────┬─────┘
//!                  │ × 1e30 / baseUnit
//!                  ▼
//!           UnderlyingPrice
//! ```

pub mod config;
pub mod feeds;
pub mod selection;
pub mod oracle;

pub use config::{AssetPriceConfig, ConfidencePolicy, FeedHandle, OracleConfig, PriceDirection, PriceFeedId};
pub use oracle::PriceOracle;

// Library version
pub const SERVICE_VERSION: &str = "0.1.0";
