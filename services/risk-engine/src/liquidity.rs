//! Liquidity calculations
//!
//! Pure folds over per-market position values. The engine gathers the
//! values (snapshot + price per entered market); everything here is
//! deterministic arithmetic with no I/O.
//!
//! Pooled:
//! `collateral = Σ cf × rate × price × tokens`,
//! `debt = Σ price × borrows + hypothetical redeem + hypothetical borrow`.
//!
//! Segregated: TypeA collateral backs TypeB debt and vice versa. Both
//! hypothetical effects on a class (redeem and borrow) are debited on the
//! debt side of the counterpart pair, next to that class's borrows.

use lending_types::errors::MathError;
use lending_types::ids::MarketId;
use lending_types::market::Classification;
use lending_types::numeric::{Exp, UnderlyingPrice};
use lending_types::risk::{AccountLiquidity, AccountSnapshot, SegregatedLiquidity};

/// A what-if applied to one market
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hypothetical {
    pub market: MarketId,
    pub redeem_tokens: u128,
    pub borrow_amount: u128,
}

impl Hypothetical {
    pub fn redeem(market: MarketId, redeem_tokens: u128) -> Self {
        Self {
            market,
            redeem_tokens,
            borrow_amount: 0,
        }
    }

    pub fn borrow(market: MarketId, borrow_amount: u128) -> Self {
        Self {
            market,
            redeem_tokens: 0,
            borrow_amount,
        }
    }
}

/// Which segregated pair judges a redeem, borrow or liquidation on an
/// asset of class `class`: the pair whose debt side carries that class.
/// A TypeA asset is judged by the TypeB pair and vice versa.
pub fn governing_bucket(class: Classification) -> Option<Classification> {
    class.counterpart()
}

/// One market's contribution to an account's figures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionValue {
    pub market: MarketId,
    pub classification: Classification,
    pub collateral: u128,
    pub borrow: u128,
    pub redeem_effect: u128,
    pub borrow_effect: u128,
}

impl PositionValue {
    /// Value a snapshot. `redeem_tokens` and `borrow_amount` are zero unless
    /// this is the hypothetically modified market.
    pub fn from_snapshot(
        market: MarketId,
        classification: Classification,
        collateral_factor: Exp,
        snapshot: &AccountSnapshot,
        price: UnderlyingPrice,
        redeem_tokens: u128,
        borrow_amount: u128,
    ) -> Result<Self, MathError> {
        let price = price.as_exp();
        let tokens_to_denom = collateral_factor.mul(snapshot.exchange_rate)?.mul(price)?;

        Ok(Self {
            market,
            classification,
            collateral: tokens_to_denom.mul_scalar_truncate(snapshot.token_balance)?,
            borrow: price.mul_scalar_truncate(snapshot.borrow_balance)?,
            redeem_effect: tokens_to_denom.mul_scalar_truncate(redeem_tokens)?,
            borrow_effect: price.mul_scalar_truncate(borrow_amount)?,
        })
    }
}

fn accumulate(total: &mut u128, value: u128) -> Result<(), MathError> {
    *total = total.checked_add(value).ok_or(MathError::Overflow)?;
    Ok(())
}

/// Pooled regime: every position shares one ledger.
pub fn pooled(positions: &[PositionValue]) -> Result<AccountLiquidity, MathError> {
    let mut collateral = 0u128;
    let mut debt = 0u128;
    for p in positions {
        accumulate(&mut collateral, p.collateral)?;
        accumulate(&mut debt, p.borrow)?;
        accumulate(&mut debt, p.redeem_effect)?;
        accumulate(&mut debt, p.borrow_effect)?;
    }
    Ok(AccountLiquidity::from_totals(collateral, debt))
}

#[derive(Default)]
struct Pair {
    collateral: u128,
    debt: u128,
}

/// Segregated regime: Unclassified positions contribute nothing.
pub fn segregated(positions: &[PositionValue]) -> Result<SegregatedLiquidity, MathError> {
    let mut a = Pair::default();
    let mut b = Pair::default();

    for p in positions {
        let (own, other) = match p.classification {
            Classification::TypeA => (&mut a, &mut b),
            Classification::TypeB => (&mut b, &mut a),
            Classification::Unclassified => continue,
        };
        accumulate(&mut own.collateral, p.collateral)?;
        accumulate(&mut other.debt, p.borrow)?;
        accumulate(&mut other.debt, p.redeem_effect)?;
        accumulate(&mut other.debt, p.borrow_effect)?;
    }

    Ok(SegregatedLiquidity {
        type_a: AccountLiquidity::from_totals(a.collateral, a.debt),
        type_b: AccountLiquidity::from_totals(b.collateral, b.debt),
    })
}
