//! The market collaborator
//!
//! Balance bookkeeping and interest accrual live in each market; the engine
//! only reads through this trait and never pushes data back.

use lending_types::ids::{AccountId, EngineId, MarketId};
use lending_types::numeric::Exp;
use lending_types::risk::AccountSnapshot;
use thiserror::Error;

/// Failure reading a market's books
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("snapshot unavailable: {0}")]
    Unavailable(String),
}

/// Read interface of a lending market
pub trait MarketLedger: Send + Sync {
    fn market_id(&self) -> MarketId;

    /// Marker distinguishing genuine markets from arbitrary contracts.
    fn is_market(&self) -> bool {
        true
    }

    /// The engine this market reports to.
    fn risk_engine(&self) -> EngineId;

    /// Balances of `account` with the current exchange rate.
    fn account_snapshot(&self, account: &AccountId) -> Result<AccountSnapshot, LedgerError>;

    /// Borrow balance without accruing interest first.
    fn borrow_balance_stored(&self, account: &AccountId) -> Result<u128, LedgerError>;

    fn total_borrows(&self) -> u128;

    fn exchange_rate_stored(&self) -> Exp;

    fn reserve_factor(&self) -> Exp;
}
