//! Liquidation calculations
//!
//! Close-factor limits, seize amounts and the deprecated-market test.

use lending_types::errors::{MathError, RiskError};
use lending_types::market::{Action, Market};
use lending_types::numeric::{Exp, UnderlyingPrice};

/// Largest repayment a single liquidation may make:
/// `close_factor × borrow_balance`, truncated.
pub fn max_close(close_factor: Exp, borrow_balance: u128) -> Result<u128, MathError> {
    close_factor.mul_scalar_truncate(borrow_balance)
}

/// Collateral tokens seized for repaying `repay_amount` of the borrowed asset.
///
/// `seize = repay × (incentive × price_borrowed) / (price_collateral × exchange_rate)`
///
/// The ratio is formed first and applied to the repay amount last, so the
/// result truncates exactly once.
pub fn seize_tokens(
    liquidation_incentive: Exp,
    price_borrowed: UnderlyingPrice,
    price_collateral: UnderlyingPrice,
    exchange_rate: Exp,
    repay_amount: u128,
) -> Result<u128, RiskError> {
    if price_borrowed.is_zero() || price_collateral.is_zero() {
        return Err(RiskError::PriceError);
    }

    let numerator = liquidation_incentive.mul(price_borrowed.as_exp())?;
    let denominator = price_collateral.as_exp().mul(exchange_rate)?;
    let ratio = numerator.div(denominator)?;
    Ok(ratio.mul_scalar_truncate(repay_amount)?)
}

/// A deprecated market can be liquidated without a shortfall: no borrowing
/// power, borrowing paused, and every unit of interest sent to reserves.
pub fn is_deprecated(market: &Market, reserve_factor: Exp) -> bool {
    market.collateral_factor.is_zero()
        && market.is_paused(Action::Borrow)
        && reserve_factor == Exp::ONE
}

#[cfg(test)]
mod tests {
    use super::*;
    use lending_types::ids::MarketId;
    use lending_types::numeric::EXP_SCALE;

    fn exp(n: u128, d: u128) -> Exp {
        Exp::from_ratio(n, d).unwrap()
    }

    #[test]
    fn test_max_close_half() {
        assert_eq!(max_close(exp(1, 2), 1_001).unwrap(), 500);
        assert_eq!(max_close(Exp::ZERO, 1_000).unwrap(), 0);
    }

    #[test]
    fn test_seize_tokens_basic() {
        // repay 100 of a 2.0 asset, collateral priced 1.0 at rate 0.02,
        // incentive 1.08 → 100 × 2.16 / 0.02 = 10_800 tokens
        let seized = seize_tokens(
            exp(108, 100),
            UnderlyingPrice::from_mantissa(2 * EXP_SCALE),
            UnderlyingPrice::from_mantissa(EXP_SCALE),
            exp(2, 100),
            100,
        )
        .unwrap();
        assert_eq!(seized, 10_800);
    }

    #[test]
    fn test_seize_tokens_zero_price() {
        let result = seize_tokens(
            Exp::ONE,
            UnderlyingPrice::ZERO,
            UnderlyingPrice::from_mantissa(EXP_SCALE),
            Exp::ONE,
            100,
        );
        assert_eq!(result, Err(RiskError::PriceError));
    }

    #[test]
    fn test_seize_tokens_zero_exchange_rate() {
        let result = seize_tokens(
            Exp::ONE,
            UnderlyingPrice::from_mantissa(EXP_SCALE),
            UnderlyingPrice::from_mantissa(EXP_SCALE),
            Exp::ZERO,
            100,
        );
        assert_eq!(result, Err(RiskError::Math(MathError::DivisionByZero)));
    }

    #[test]
    fn test_deprecation_needs_all_three() {
        let mut market = Market::listed(MarketId::new());
        assert!(!is_deprecated(&market, Exp::ONE));

        market.pause.set(Action::Borrow, true);
        assert!(is_deprecated(&market, Exp::ONE));
        assert!(!is_deprecated(&market, exp(99, 100)));

        market.collateral_factor = exp(1, 2);
        assert!(!is_deprecated(&market, Exp::ONE));
    }
}
