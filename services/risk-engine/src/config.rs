//! Risk engine configuration

use lending_types::errors::MathError;
use lending_types::numeric::Exp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Initial engine parameters. All remain adjustable through admin setters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskEngineConfig {
    /// Largest fraction of a borrow repayable in one liquidation
    pub close_factor: Decimal,
    /// Collateral bonus multiplier paid to liquidators
    pub liquidation_incentive: Decimal,
    /// Start in the segregated (TypeA/TypeB) regime
    pub segregation_mode: bool,
}

impl Default for RiskEngineConfig {
    fn default() -> Self {
        Self {
            close_factor: Decimal::new(5, 1),
            liquidation_incentive: Decimal::new(108, 2),
            segregation_mode: false,
        }
    }
}

impl RiskEngineConfig {
    pub fn close_factor_exp(&self) -> Result<Exp, MathError> {
        Exp::from_decimal(self.close_factor)
    }

    pub fn liquidation_incentive_exp(&self) -> Result<Exp, MathError> {
        Exp::from_decimal(self.liquidation_incentive)
    }
}
