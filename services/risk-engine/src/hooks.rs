//! Pre-action and post-action hooks
//!
//! A market calls the `*_allowed` hook before changing balances and halts
//! the action on `Err`. Ordinary health failures are errors, never panics.
//! The `*_verify` hooks run after the action; only `redeem_verify` checks
//! anything.

use lending_types::errors::RiskError;
use lending_types::ids::{AccountId, MarketId};
use lending_types::market::{Action, Classification};
use tracing::warn;

use crate::engine::{ListedMarket, RiskEngine};
use crate::liquidation;
use crate::liquidity::{governing_bucket, Hypothetical};

fn denied(hook: &'static str, market: &MarketId, err: &RiskError) {
    warn!(hook, market = %market, error = %err, "Hook denied");
}

impl RiskEngine {
    fn listed(&self, market: &MarketId) -> Result<&ListedMarket, RiskError> {
        self.markets.get(market).ok_or(RiskError::MarketNotListed)
    }

    fn unpaused(&self, market: &MarketId, action: Action) -> Result<&ListedMarket, RiskError> {
        let listed = self.listed(market)?;
        if listed.record.is_paused(action) {
            return Err(RiskError::ActionPaused { action });
        }
        Ok(listed)
    }

    /// Classification of a market that may take part in segregated accounting.
    fn segregated_class(&self, listed: &ListedMarket) -> Result<Classification, RiskError> {
        let class = listed.record.classification;
        if class.is_classified() {
            Ok(class)
        } else {
            Err(RiskError::rejection(
                "unclassified market in segregation mode",
            ))
        }
    }

    /// Health check for a hypothetical redeem or borrow under the active regime.
    fn hypothetical_check(
        &self,
        account: &AccountId,
        hypothetical: Hypothetical,
        class: Classification,
    ) -> Result<(), RiskError> {
        let shortfall = if self.segregation_mode {
            let figures = self.segregated_liquidity(account, Some(&hypothetical))?;
            governing_bucket(class)
                .and_then(|bucket| figures.bucket(bucket))
                .map(|b| b.shortfall)
                .ok_or_else(|| RiskError::rejection("no governing bucket"))?
        } else {
            self.pooled_liquidity(account, Some(&hypothetical))?.shortfall
        };

        if shortfall > 0 {
            return Err(RiskError::InsufficientLiquidity);
        }
        Ok(())
    }

    pub(crate) fn redeem_check(
        &self,
        market: &MarketId,
        redeemer: &AccountId,
        redeem_tokens: u128,
    ) -> Result<(), RiskError> {
        let listed = self.listed(market)?;
        let class = listed.record.classification;
        if self.segregation_mode {
            self.segregated_class(listed)?;
        }

        // outside the market's collateral set nothing can be at risk
        if !self.membership.is_member(redeemer, market) {
            return Ok(());
        }

        self.hypothetical_check(
            redeemer,
            Hypothetical::redeem(*market, redeem_tokens),
            class,
        )
    }

    // ── Mint ──────────────────────────────────────────────────────────────

    /// A deposit is allowed unless the market is unlisted or minting is
    /// paused. The first deposit makes the minter a member.
    pub fn mint_allowed(
        &mut self,
        market: &MarketId,
        minter: &AccountId,
        _mint_amount: u128,
    ) -> Result<(), RiskError> {
        if let Err(e) = self.unpaused(market, Action::Mint) {
            denied("mint", market, &e);
            return Err(e);
        }
        self.join(*minter, *market);
        Ok(())
    }

    pub fn mint_verify(&self, _market: &MarketId, _minter: &AccountId, _amount: u128, _tokens: u128) {}

    // ── Redeem ────────────────────────────────────────────────────────────

    pub fn redeem_allowed(
        &self,
        market: &MarketId,
        redeemer: &AccountId,
        redeem_tokens: u128,
    ) -> Result<(), RiskError> {
        self.redeem_check(market, redeemer, redeem_tokens)
            .inspect_err(|e| denied("redeem", market, e))
    }

    /// Rejects a redemption that paid out underlying for zero tokens.
    pub fn redeem_verify(
        &self,
        _market: &MarketId,
        _redeemer: &AccountId,
        redeem_amount: u128,
        redeem_tokens: u128,
    ) -> Result<(), RiskError> {
        if redeem_tokens == 0 && redeem_amount > 0 {
            return Err(RiskError::rejection("redeem tokens zero"));
        }
        Ok(())
    }

    // ── Borrow ────────────────────────────────────────────────────────────

    pub fn borrow_allowed(
        &mut self,
        market: &MarketId,
        borrower: &AccountId,
        borrow_amount: u128,
    ) -> Result<(), RiskError> {
        self.borrow_check(market, borrower, borrow_amount)
            .inspect_err(|e| denied("borrow", market, e))
    }

    fn borrow_check(
        &mut self,
        market: &MarketId,
        borrower: &AccountId,
        borrow_amount: u128,
    ) -> Result<(), RiskError> {
        let listed = self.unpaused(market, Action::Borrow)?;
        let class = listed.record.classification;
        if self.segregation_mode {
            self.segregated_class(listed)?;
        }

        if !self.membership.is_member(borrower, market) {
            self.join(*borrower, *market);
            assert!(
                self.membership.is_member(borrower, market),
                "borrower not a member after join"
            );
        }

        self.price_of(market)?;

        let listed = self.listed(market)?;
        if listed.record.has_borrow_cap() {
            let next_total = listed
                .ledger
                .total_borrows()
                .checked_add(borrow_amount)
                .ok_or(RiskError::BorrowCapReached)?;
            if next_total >= listed.record.borrow_cap {
                return Err(RiskError::BorrowCapReached);
            }
        }

        self.hypothetical_check(
            borrower,
            Hypothetical::borrow(*market, borrow_amount),
            class,
        )
    }

    pub fn borrow_verify(&self, _market: &MarketId, _borrower: &AccountId, _amount: u128) {}

    // ── Repay ─────────────────────────────────────────────────────────────

    pub fn repay_borrow_allowed(
        &self,
        market: &MarketId,
        _payer: &AccountId,
        _borrower: &AccountId,
        _repay_amount: u128,
    ) -> Result<(), RiskError> {
        self.listed(market)
            .map(|_| ())
            .inspect_err(|e| denied("repay", market, e))
    }

    pub fn repay_borrow_verify(
        &self,
        _market: &MarketId,
        _payer: &AccountId,
        _borrower: &AccountId,
        _amount: u128,
    ) {
    }

    // ── Liquidate ─────────────────────────────────────────────────────────

    pub fn liquidate_borrow_allowed(
        &self,
        borrowed: &MarketId,
        collateral: &MarketId,
        liquidator: &AccountId,
        borrower: &AccountId,
        repay_amount: u128,
    ) -> Result<(), RiskError> {
        self.liquidate_check(borrowed, collateral, liquidator, borrower, repay_amount)
            .inspect_err(|e| denied("liquidate", borrowed, e))
    }

    fn liquidate_check(
        &self,
        borrowed: &MarketId,
        collateral: &MarketId,
        _liquidator: &AccountId,
        borrower: &AccountId,
        repay_amount: u128,
    ) -> Result<(), RiskError> {
        let borrowed_market = self.listed(borrowed)?;
        let collateral_market = self.listed(collateral)?;

        let borrow_balance = borrowed_market
            .ledger
            .borrow_balance_stored(borrower)
            .map_err(|_| RiskError::SnapshotError)?;

        let reserve_factor = borrowed_market.ledger.reserve_factor();
        if liquidation::is_deprecated(&borrowed_market.record, reserve_factor) {
            if repay_amount == 0 {
                return Err(RiskError::rejection("zero repay"));
            }
            if repay_amount > borrow_balance {
                return Err(RiskError::TooMuchRepay);
            }
            return Ok(());
        }

        let shortfall = if self.segregation_mode {
            let borrowed_class = self.segregated_class(borrowed_market)?;
            let backing = borrowed_class.counterpart();
            if Some(collateral_market.record.classification) != backing {
                return Err(RiskError::rejection(
                    "collateral outside the bucket backing this borrow",
                ));
            }
            let figures = self.segregated_liquidity(borrower, None)?;
            governing_bucket(borrowed_class)
                .and_then(|bucket| figures.bucket(bucket))
                .map(|b| b.shortfall)
                .ok_or_else(|| RiskError::rejection("no governing bucket"))?
        } else {
            self.pooled_liquidity(borrower, None)?.shortfall
        };
        if shortfall == 0 {
            return Err(RiskError::InsufficientShortfall);
        }

        let max_close = liquidation::max_close(self.close_factor, borrow_balance)?;
        if repay_amount > max_close {
            return Err(RiskError::TooMuchRepay);
        }
        Ok(())
    }

    pub fn liquidate_borrow_verify(
        &self,
        _borrowed: &MarketId,
        _collateral: &MarketId,
        _liquidator: &AccountId,
        _borrower: &AccountId,
        _repay_amount: u128,
        _seize_tokens: u128,
    ) {
    }

    // ── Seize ─────────────────────────────────────────────────────────────

    /// Both legs listed and reporting to the same engine.
    pub fn seize_allowed(
        &self,
        collateral: &MarketId,
        borrowed: &MarketId,
        _liquidator: &AccountId,
        _borrower: &AccountId,
        _seize_tokens: u128,
    ) -> Result<(), RiskError> {
        self.seize_check(collateral, borrowed)
            .inspect_err(|e| denied("seize", collateral, e))
    }

    fn seize_check(&self, collateral: &MarketId, borrowed: &MarketId) -> Result<(), RiskError> {
        let collateral_market = self.unpaused(collateral, Action::Seize)?;
        let borrowed_market = self.listed(borrowed)?;
        if collateral_market.ledger.risk_engine() != borrowed_market.ledger.risk_engine() {
            return Err(RiskError::EngineMismatch);
        }
        Ok(())
    }

    pub fn seize_verify(
        &self,
        _collateral: &MarketId,
        _borrowed: &MarketId,
        _liquidator: &AccountId,
        _borrower: &AccountId,
        _seize_tokens: u128,
    ) {
    }

    // ── Transfer ──────────────────────────────────────────────────────────

    /// Moving tokens away is judged like redeeming them.
    pub fn transfer_allowed(
        &self,
        market: &MarketId,
        src: &AccountId,
        _dst: &AccountId,
        transfer_tokens: u128,
    ) -> Result<(), RiskError> {
        self.unpaused(market, Action::Transfer)
            .and_then(|_| self.redeem_check(market, src, transfer_tokens))
            .inspect_err(|e| denied("transfer", market, e))
    }

    pub fn transfer_verify(&self, _market: &MarketId, _src: &AccountId, _dst: &AccountId, _tokens: u128) {}
}
