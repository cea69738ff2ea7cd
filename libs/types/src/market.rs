//! Market registry records
//!
//! A market is created when an admin lists it, mutated only by admin
//! setters, and never deleted. "Deprecating" a market means zeroing its
//! collateral factor and pausing borrows.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::MarketId;
use crate::numeric::Exp;

/// Upper bound on any collateral factor: 0.9
pub const MAX_COLLATERAL_FACTOR: Exp = Exp::from_mantissa(900_000_000_000_000_000);

/// Bucket an asset belongs to under segregation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Classification {
    /// Contributes nothing while segregation mode is enabled
    #[default]
    Unclassified,
    TypeA,
    TypeB,
}

impl Classification {
    /// The bucket whose collateral backs borrowing of this class.
    ///
    /// TypeA collateral backs TypeB borrows and vice versa.
    pub fn counterpart(self) -> Option<Classification> {
        match self {
            Classification::TypeA => Some(Classification::TypeB),
            Classification::TypeB => Some(Classification::TypeA),
            Classification::Unclassified => None,
        }
    }

    pub fn is_classified(self) -> bool {
        self != Classification::Unclassified
    }
}

/// Pausable actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Mint,
    Borrow,
    Transfer,
    Seize,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Mint => "mint",
            Action::Borrow => "borrow",
            Action::Transfer => "transfer",
            Action::Seize => "seize",
        };
        f.write_str(label)
    }
}

/// Per-market pause flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PauseFlags {
    pub mint: bool,
    pub borrow: bool,
    pub transfer: bool,
    pub seize: bool,
}

impl PauseFlags {
    pub fn is_paused(&self, action: Action) -> bool {
        match action {
            Action::Mint => self.mint,
            Action::Borrow => self.borrow,
            Action::Transfer => self.transfer,
            Action::Seize => self.seize,
        }
    }

    pub fn set(&mut self, action: Action, paused: bool) {
        match action {
            Action::Mint => self.mint = paused,
            Action::Borrow => self.borrow = paused,
            Action::Transfer => self.transfer = paused,
            Action::Seize => self.seize = paused,
        }
    }
}

/// Registry entry for a listed market
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    pub id: MarketId,
    pub is_listed: bool,
    /// Fraction of value usable as borrowing power, `0 ≤ cf ≤ 0.9`
    pub collateral_factor: Exp,
    /// Total borrows must stay strictly below this; 0 = unlimited
    pub borrow_cap: u128,
    pub pause: PauseFlags,
    pub classification: Classification,
}

impl Market {
    /// A freshly listed market: zero collateral factor, no cap, nothing paused
    pub fn listed(id: MarketId) -> Self {
        Self {
            id,
            is_listed: true,
            collateral_factor: Exp::ZERO,
            borrow_cap: 0,
            pause: PauseFlags::default(),
            classification: Classification::Unclassified,
        }
    }

    pub fn is_paused(&self, action: Action) -> bool {
        self.pause.is_paused(action)
    }

    pub fn has_borrow_cap(&self) -> bool {
        self.borrow_cap != 0
    }
}
