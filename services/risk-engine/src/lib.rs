//! Risk Engine Service
//!
//! Decides whether each deposit, withdrawal, borrow, repayment, liquidation
//! and transfer leaves an account solvent. Two accounting regimes:
//!
//! - **Pooled**: every entered market feeds one collateral/borrow ledger.
//! - **Segregated**: TypeA collateral backs only TypeB borrows and vice
//!   versa; Unclassified markets are ignored.
//!
//! Balances come from each market through [`MarketLedger`]; prices from a
//! [`lending_types::PriceSource`]. Nothing is cached between calls.

pub mod config;
pub mod engine;
pub mod events;
pub mod hooks;
pub mod ledger;
pub mod liquidation;
pub mod liquidity;
pub mod membership;

pub use config::RiskEngineConfig;
pub use engine::RiskEngine;
pub use events::{RiskEvent, RiskEventType};
pub use ledger::{LedgerError, MarketLedger};
