//! Solvency result types
//!
//! Liquidity figures are ephemeral: recomputed on every query, never
//! persisted. All values are value totals at 1e18 scale.

use serde::{Deserialize, Serialize};

use crate::market::Classification;
use crate::numeric::Exp;

/// A market's view of one account's balances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// Market tokens held (collateral side)
    pub token_balance: u128,
    /// Underlying owed (borrow side)
    pub borrow_balance: u128,
    /// Underlying per market token
    pub exchange_rate: Exp,
}

/// Pooled regime result.
///
/// Invariant: `liquidity` and `shortfall` are never both positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccountLiquidity {
    pub liquidity: u128,
    pub shortfall: u128,
}

impl AccountLiquidity {
    /// Net a collateral total against a borrow total.
    pub fn from_totals(collateral: u128, borrow: u128) -> Self {
        if collateral > borrow {
            Self {
                liquidity: collateral - borrow,
                shortfall: 0,
            }
        } else {
            Self {
                liquidity: 0,
                shortfall: borrow - collateral,
            }
        }
    }

    pub fn has_shortfall(&self) -> bool {
        self.shortfall > 0
    }
}

/// Segregated regime result.
///
/// `type_a` nets TypeA collateral against TypeB borrows (plus hypothetical
/// effects); `type_b` nets TypeB collateral against TypeA borrows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SegregatedLiquidity {
    pub type_a: AccountLiquidity,
    pub type_b: AccountLiquidity,
}

impl SegregatedLiquidity {
    pub fn liquidity_a(&self) -> u128 {
        self.type_a.liquidity
    }

    pub fn shortfall_a(&self) -> u128 {
        self.type_a.shortfall
    }

    pub fn liquidity_b(&self) -> u128 {
        self.type_b.liquidity
    }

    pub fn shortfall_b(&self) -> u128 {
        self.type_b.shortfall
    }

    /// The pair whose collateral is of class `collateral`.
    pub fn bucket(&self, collateral: Classification) -> Option<&AccountLiquidity> {
        match collateral {
            Classification::TypeA => Some(&self.type_a),
            Classification::TypeB => Some(&self.type_b),
            Classification::Unclassified => None,
        }
    }

    /// `(liquidityA, shortfallA, liquidityB, shortfallB)`
    pub fn as_tuple(&self) -> (u128, u128, u128, u128) {
        (
            self.liquidity_a(),
            self.shortfall_a(),
            self.liquidity_b(),
            self.shortfall_b(),
        )
    }
}
