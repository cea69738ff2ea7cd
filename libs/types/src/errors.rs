//! Error taxonomy shared by the risk engine and the price oracle
//!
//! Comprehensive error taxonomy using thiserror. Hooks and queries return
//! these to the calling market, which is responsible for halting the
//! underlying action; nothing here is retried internally.

use thiserror::Error;

use crate::market::Action;

/// Fixed-point arithmetic failure
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("arithmetic overflow")]
    Overflow,

    #[error("arithmetic underflow")]
    Underflow,

    #[error("division by zero")]
    DivisionByZero,
}

/// Risk engine errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    #[error("Unauthorized: caller lacks the required role")]
    Unauthorized,

    #[error("Market not listed")]
    MarketNotListed,

    #[error("Market already listed")]
    MarketAlreadyListed,

    #[error("Not a lending market")]
    NotMarket,

    #[error("Invalid collateral factor")]
    InvalidCollateralFactor,

    #[error("Price error: oracle returned no usable price")]
    PriceError,

    #[error("Snapshot error: balance read failed")]
    SnapshotError,

    #[error("Insufficient liquidity")]
    InsufficientLiquidity,

    #[error("Insufficient shortfall: account is not liquidatable")]
    InsufficientShortfall,

    #[error("Too much repay: exceeds close factor")]
    TooMuchRepay,

    #[error("Nonzero borrow balance")]
    NonzeroBorrowBalance,

    #[error("Rejected: {reason}")]
    Rejection { reason: String },

    #[error("{action} is paused")]
    ActionPaused { action: Action },

    #[error("Market borrow cap reached")]
    BorrowCapReached,

    #[error("Markets are governed by different risk engines")]
    EngineMismatch,

    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

impl RiskError {
    pub fn rejection(reason: impl Into<String>) -> Self {
        Self::Rejection {
            reason: reason.into(),
        }
    }
}

/// Price oracle errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    #[error("Unauthorized: caller is not admin")]
    Unauthorized,

    #[error("Market not configured")]
    MarketNotConfigured,

    #[error("Price not found: no usable price source")]
    PriceNotFound,

    #[error("Invalid configuration at index {index}: {reason}")]
    InvalidConfiguration { index: usize, reason: String },

    #[error("Math error: {0}")]
    Math(#[from] MathError),
}
