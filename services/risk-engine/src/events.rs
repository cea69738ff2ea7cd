//! Risk event definitions
//!
//! Every admin mutation and membership change appends one event to the
//! engine's log. Shipping them anywhere is the caller's business.

use lending_types::access::Role;
use lending_types::ids::{AccountId, MarketId};
use lending_types::market::{Action, Classification};
use lending_types::numeric::Exp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event emitted by the risk engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskEvent {
    pub event_id: Uuid,
    pub event_type: RiskEventType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskEventType {
    MarketListed {
        market: MarketId,
    },
    MarketEntered {
        market: MarketId,
        account: AccountId,
    },
    MarketExited {
        market: MarketId,
        account: AccountId,
    },
    NewCollateralFactor {
        market: MarketId,
        old: Exp,
        new: Exp,
    },
    NewCloseFactor {
        old: Exp,
        new: Exp,
    },
    NewLiquidationIncentive {
        old: Exp,
        new: Exp,
    },
    NewPriceOracle,
    NewBorrowCap {
        market: MarketId,
        cap: u128,
    },
    ActionPaused {
        market: MarketId,
        action: Action,
        paused: bool,
    },
    NewClassification {
        market: MarketId,
        old: Classification,
        new: Classification,
    },
    SegregationModeToggled {
        enabled: bool,
    },
    /// Guardian role assigned or revoked
    NewGuardian {
        role: Role,
        old: Option<AccountId>,
        new: Option<AccountId>,
    },
    NewAdmin {
        old: AccountId,
        new: AccountId,
    },
}

impl RiskEvent {
    pub fn new(event_type: RiskEventType) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            event_type,
        }
    }
}

/// Append-only event log
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<RiskEvent>,
}

impl EventLog {
    pub fn push(&mut self, event_type: RiskEventType) {
        self.events.push(RiskEvent::new(event_type));
    }

    pub fn as_slice(&self) -> &[RiskEvent] {
        &self.events
    }

    /// Hand over everything recorded so far, leaving the log empty.
    pub fn drain(&mut self) -> Vec<RiskEvent> {
        std::mem::take(&mut self.events)
    }
}
