//! Risk Engine: registry, membership and liquidity
//!
//! Owns the market registry, the account membership index and the global
//! parameters. The action hooks live in `hooks.rs` as a second `impl` block.

use std::collections::HashMap;
use std::sync::Arc;

use lending_types::access::{AccessControl, Role};
use lending_types::errors::RiskError;
use lending_types::ids::{AccountId, EngineId, MarketId};
use lending_types::market::{Action, Classification, Market, MAX_COLLATERAL_FACTOR};
use lending_types::numeric::{Exp, UnderlyingPrice};
use lending_types::risk::{AccountLiquidity, SegregatedLiquidity};
use lending_types::PriceSource;
use tracing::{debug, info, warn};

use crate::config::RiskEngineConfig;
use crate::events::{EventLog, RiskEvent, RiskEventType};
use crate::ledger::MarketLedger;
use crate::liquidation;
use crate::liquidity::{self, Hypothetical, PositionValue};
use crate::membership::MembershipIndex;

/// A registry record plus the handle used to read its books
#[derive(Clone)]
pub(crate) struct ListedMarket {
    pub(crate) record: Market,
    pub(crate) ledger: Arc<dyn MarketLedger>,
}

/// Risk engine service
pub struct RiskEngine {
    id: EngineId,
    access: AccessControl,
    oracle: Option<Arc<dyn PriceSource>>,
    pub(crate) markets: HashMap<MarketId, ListedMarket>,
    all_markets: Vec<MarketId>,
    pub(crate) membership: MembershipIndex,
    pub(crate) close_factor: Exp,
    pub(crate) liquidation_incentive: Exp,
    pub(crate) segregation_mode: bool,
    pub(crate) events: EventLog,
}

impl RiskEngine {
    /// Create a new engine with default parameters and no oracle.
    pub fn new(id: EngineId, admin: AccountId) -> Self {
        Self {
            id,
            access: AccessControl::new(admin),
            oracle: None,
            markets: HashMap::new(),
            all_markets: Vec::new(),
            membership: MembershipIndex::new(),
            close_factor: Exp::from_mantissa(500_000_000_000_000_000),
            liquidation_incentive: Exp::from_mantissa(1_080_000_000_000_000_000),
            segregation_mode: false,
            events: EventLog::default(),
        }
    }

    /// Create a new engine from explicit parameters.
    pub fn with_config(
        id: EngineId,
        admin: AccountId,
        config: &RiskEngineConfig,
    ) -> Result<Self, RiskError> {
        let mut engine = Self::new(id, admin);
        engine.close_factor = config.close_factor_exp()?;
        engine.liquidation_incentive = config.liquidation_incentive_exp()?;
        engine.segregation_mode = config.segregation_mode;
        info!(
            engine = %id,
            close_factor = %engine.close_factor,
            liquidation_incentive = %engine.liquidation_incentive,
            segregation_mode = engine.segregation_mode,
            "RiskEngine initialized"
        );
        Ok(engine)
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    pub fn id(&self) -> EngineId {
        self.id
    }

    pub fn admin(&self) -> AccountId {
        self.access.admin()
    }

    pub fn pause_guardian(&self) -> Option<AccountId> {
        self.access.holder(Role::PauseGuardian)
    }

    pub fn borrow_cap_guardian(&self) -> Option<AccountId> {
        self.access.holder(Role::BorrowCapGuardian)
    }

    pub fn market(&self, market: &MarketId) -> Option<&Market> {
        self.markets.get(market).map(|m| &m.record)
    }

    /// Every listed market, in listing order
    pub fn all_markets(&self) -> &[MarketId] {
        &self.all_markets
    }

    pub fn assets_in(&self, account: &AccountId) -> &[MarketId] {
        self.membership.assets_in(account)
    }

    pub fn check_membership(&self, account: &AccountId, market: &MarketId) -> bool {
        self.membership.is_member(account, market)
    }

    pub fn close_factor(&self) -> Exp {
        self.close_factor
    }

    pub fn liquidation_incentive(&self) -> Exp {
        self.liquidation_incentive
    }

    pub fn segregation_mode(&self) -> bool {
        self.segregation_mode
    }

    /// Zero collateral factor, borrowing paused and a 100% reserve factor.
    pub fn is_deprecated(&self, market: &MarketId) -> bool {
        self.markets
            .get(market)
            .map_or(false, |m| {
                liquidation::is_deprecated(&m.record, m.ledger.reserve_factor())
            })
    }

    pub fn events(&self) -> &[RiskEvent] {
        self.events.as_slice()
    }

    pub fn drain_events(&mut self) -> Vec<RiskEvent> {
        self.events.drain()
    }

    // ── Admin ─────────────────────────────────────────────────────────────

    fn require_admin(&self, caller: &AccountId) -> Result<(), RiskError> {
        if self.access.is_admin(caller) {
            Ok(())
        } else {
            warn!(caller = %caller, "Admin check failed");
            Err(RiskError::Unauthorized)
        }
    }

    fn listed_mut(&mut self, market: &MarketId) -> Result<&mut Market, RiskError> {
        self.markets
            .get_mut(market)
            .map(|m| &mut m.record)
            .ok_or(RiskError::MarketNotListed)
    }

    /// List a market. Admin-only.
    pub fn support_market(
        &mut self,
        caller: &AccountId,
        ledger: Arc<dyn MarketLedger>,
    ) -> Result<(), RiskError> {
        self.require_admin(caller)?;
        if !ledger.is_market() {
            return Err(RiskError::NotMarket);
        }
        let id = ledger.market_id();
        if self.markets.contains_key(&id) {
            return Err(RiskError::MarketAlreadyListed);
        }

        self.markets.insert(
            id,
            ListedMarket {
                record: Market::listed(id),
                ledger,
            },
        );
        self.all_markets.push(id);
        self.events.push(RiskEventType::MarketListed { market: id });
        info!(market = %id, "Market listed");
        Ok(())
    }

    pub fn set_price_oracle(
        &mut self,
        caller: &AccountId,
        oracle: Arc<dyn PriceSource>,
    ) -> Result<(), RiskError> {
        self.require_admin(caller)?;
        self.oracle = Some(oracle);
        self.events.push(RiskEventType::NewPriceOracle);
        info!("Price oracle replaced");
        Ok(())
    }

    /// Set a market's collateral factor. A nonzero factor needs a live price.
    pub fn set_collateral_factor(
        &mut self,
        caller: &AccountId,
        market: &MarketId,
        collateral_factor: Exp,
    ) -> Result<(), RiskError> {
        self.require_admin(caller)?;
        if !self.markets.contains_key(market) {
            return Err(RiskError::MarketNotListed);
        }
        if collateral_factor > MAX_COLLATERAL_FACTOR {
            return Err(RiskError::InvalidCollateralFactor);
        }
        if !collateral_factor.is_zero() {
            self.price_of(market)?;
        }

        let record = self.listed_mut(market)?;
        let old = std::mem::replace(&mut record.collateral_factor, collateral_factor);
        self.events.push(RiskEventType::NewCollateralFactor {
            market: *market,
            old,
            new: collateral_factor,
        });
        info!(market = %market, old = %old, new = %collateral_factor, "Collateral factor updated");
        Ok(())
    }

    pub fn set_close_factor(&mut self, caller: &AccountId, close_factor: Exp) -> Result<(), RiskError> {
        self.require_admin(caller)?;
        let old = std::mem::replace(&mut self.close_factor, close_factor);
        self.events.push(RiskEventType::NewCloseFactor { old, new: close_factor });
        info!(old = %old, new = %close_factor, "Close factor updated");
        Ok(())
    }

    pub fn set_liquidation_incentive(
        &mut self,
        caller: &AccountId,
        incentive: Exp,
    ) -> Result<(), RiskError> {
        self.require_admin(caller)?;
        let old = std::mem::replace(&mut self.liquidation_incentive, incentive);
        self.events
            .push(RiskEventType::NewLiquidationIncentive { old, new: incentive });
        info!(old = %old, new = %incentive, "Liquidation incentive updated");
        Ok(())
    }

    /// Set borrow caps for a batch of markets. Admin or borrow-cap guardian.
    ///
    /// Every market must be listed; otherwise nothing is applied.
    pub fn set_market_borrow_caps(
        &mut self,
        caller: &AccountId,
        caps: &[(MarketId, u128)],
    ) -> Result<(), RiskError> {
        if !self.access.is_admin_or(caller, Role::BorrowCapGuardian) {
            return Err(RiskError::Unauthorized);
        }
        if caps.iter().any(|(m, _)| !self.markets.contains_key(m)) {
            return Err(RiskError::MarketNotListed);
        }

        for &(market, cap) in caps {
            self.listed_mut(&market)?.borrow_cap = cap;
            self.events.push(RiskEventType::NewBorrowCap { market, cap });
            info!(market = %market, cap, "Borrow cap updated");
        }
        Ok(())
    }

    /// Pause or resume one action on a market.
    ///
    /// The pause guardian may pause; only the admin may resume.
    pub fn set_action_paused(
        &mut self,
        caller: &AccountId,
        market: &MarketId,
        action: Action,
        paused: bool,
    ) -> Result<(), RiskError> {
        let allowed = if paused {
            self.access.is_admin_or(caller, Role::PauseGuardian)
        } else {
            self.access.is_admin(caller)
        };
        if !allowed {
            return Err(RiskError::Unauthorized);
        }

        self.listed_mut(market)?.pause.set(action, paused);
        self.events.push(RiskEventType::ActionPaused {
            market: *market,
            action,
            paused,
        });
        info!(market = %market, action = %action, paused, "Pause flag updated");
        Ok(())
    }

    pub fn set_classification(
        &mut self,
        caller: &AccountId,
        market: &MarketId,
        classification: Classification,
    ) -> Result<(), RiskError> {
        self.require_admin(caller)?;
        let record = self.listed_mut(market)?;
        let old = std::mem::replace(&mut record.classification, classification);
        self.events.push(RiskEventType::NewClassification {
            market: *market,
            old,
            new: classification,
        });
        info!(market = %market, ?old, new = ?classification, "Classification updated");
        Ok(())
    }

    pub fn set_segregation_mode(&mut self, caller: &AccountId, enabled: bool) -> Result<(), RiskError> {
        self.require_admin(caller)?;
        self.segregation_mode = enabled;
        self.events.push(RiskEventType::SegregationModeToggled { enabled });
        info!(enabled, "Segregation mode toggled");
        Ok(())
    }

    pub fn set_pause_guardian(
        &mut self,
        caller: &AccountId,
        guardian: Option<AccountId>,
    ) -> Result<(), RiskError> {
        self.set_guardian(caller, Role::PauseGuardian, guardian)
    }

    pub fn set_borrow_cap_guardian(
        &mut self,
        caller: &AccountId,
        guardian: Option<AccountId>,
    ) -> Result<(), RiskError> {
        self.set_guardian(caller, Role::BorrowCapGuardian, guardian)
    }

    fn set_guardian(
        &mut self,
        caller: &AccountId,
        role: Role,
        guardian: Option<AccountId>,
    ) -> Result<(), RiskError> {
        let old = self.access.holder(role);
        if !self.access.set_guardian(caller, role, guardian) {
            return Err(RiskError::Unauthorized);
        }
        self.events.push(RiskEventType::NewGuardian {
            role,
            old,
            new: guardian,
        });
        info!(role = ?role, old = ?old, new = ?guardian, "Guardian updated");
        Ok(())
    }

    pub fn transfer_admin(&mut self, caller: &AccountId, new_admin: AccountId) -> Result<(), RiskError> {
        let old = self.access.admin();
        if !self.access.transfer_admin(caller, new_admin) {
            return Err(RiskError::Unauthorized);
        }
        self.events.push(RiskEventType::NewAdmin { old, new: new_admin });
        info!(old = %old, new = %new_admin, "Admin transferred");
        Ok(())
    }

    // ── Membership ────────────────────────────────────────────────────────

    /// Enter each market in turn; one result per requested market.
    pub fn enter_markets(&mut self, account: AccountId, markets: &[MarketId]) -> Vec<Result<(), RiskError>> {
        markets
            .iter()
            .map(|market| {
                if !self.markets.contains_key(market) {
                    return Err(RiskError::MarketNotListed);
                }
                self.join(account, *market);
                Ok(())
            })
            .collect()
    }

    /// Leave a market. Requires no outstanding borrow there and that the
    /// account stays healthy without the market's collateral.
    pub fn exit_market(&mut self, account: AccountId, market: &MarketId) -> Result<(), RiskError> {
        let listed = self.markets.get(market).ok_or(RiskError::MarketNotListed)?;
        let snapshot = listed
            .ledger
            .account_snapshot(&account)
            .map_err(|_| RiskError::SnapshotError)?;
        if snapshot.borrow_balance != 0 {
            return Err(RiskError::NonzeroBorrowBalance);
        }
        self.redeem_check(market, &account, snapshot.token_balance)?;

        if self.membership.leave(&account, market) {
            self.events.push(RiskEventType::MarketExited {
                market: *market,
                account,
            });
            debug!(account = %account, market = %market, "Market exited");
        }
        Ok(())
    }

    /// Add to both membership views. No-op for existing members.
    pub(crate) fn join(&mut self, account: AccountId, market: MarketId) {
        if self.membership.join(account, market) {
            self.events.push(RiskEventType::MarketEntered { market, account });
            debug!(account = %account, market = %market, "Market entered");
        }
    }

    // ── Valuation ─────────────────────────────────────────────────────────

    /// Nonzero price for a market's underlying, or `PriceError`.
    pub(crate) fn price_of(&self, market: &MarketId) -> Result<UnderlyingPrice, RiskError> {
        let oracle = self.oracle.as_ref().ok_or(RiskError::PriceError)?;
        match oracle.underlying_price(market) {
            Ok(price) if !price.is_zero() => Ok(price),
            Ok(_) => Err(RiskError::PriceError),
            Err(e) => {
                warn!(market = %market, error = %e, "Oracle price unavailable");
                Err(RiskError::PriceError)
            }
        }
    }

    /// Value each entered market. In segregation mode Unclassified markets
    /// are skipped without reading their books.
    fn positions(
        &self,
        account: &AccountId,
        hypothetical: Option<&Hypothetical>,
        segregated: bool,
    ) -> Result<Vec<PositionValue>, RiskError> {
        let mut out = Vec::new();
        for market_id in self.membership.assets_in(account) {
            let listed = self
                .markets
                .get(market_id)
                .ok_or(RiskError::MarketNotListed)?;
            let class = listed.record.classification;
            if segregated && !class.is_classified() {
                continue;
            }

            let snapshot = listed.ledger.account_snapshot(account).map_err(|e| {
                warn!(account = %account, market = %market_id, error = %e, "Snapshot failed");
                RiskError::SnapshotError
            })?;
            let price = self.price_of(market_id)?;

            let (redeem, borrow) = match hypothetical {
                Some(h) if h.market == *market_id => (h.redeem_tokens, h.borrow_amount),
                _ => (0, 0),
            };
            out.push(PositionValue::from_snapshot(
                *market_id,
                class,
                listed.record.collateral_factor,
                &snapshot,
                price,
                redeem,
                borrow,
            )?);
        }
        Ok(out)
    }

    pub(crate) fn pooled_liquidity(
        &self,
        account: &AccountId,
        hypothetical: Option<&Hypothetical>,
    ) -> Result<AccountLiquidity, RiskError> {
        let positions = self.positions(account, hypothetical, false)?;
        let result = liquidity::pooled(&positions)?;
        debug!(
            account = %account,
            liquidity = result.liquidity,
            shortfall = result.shortfall,
            "Pooled liquidity"
        );
        Ok(result)
    }

    pub(crate) fn segregated_liquidity(
        &self,
        account: &AccountId,
        hypothetical: Option<&Hypothetical>,
    ) -> Result<SegregatedLiquidity, RiskError> {
        let positions = self.positions(account, hypothetical, true)?;
        let result = liquidity::segregated(&positions)?;
        debug!(
            account = %account,
            liquidity_a = result.liquidity_a(),
            shortfall_a = result.shortfall_a(),
            liquidity_b = result.liquidity_b(),
            shortfall_b = result.shortfall_b(),
            "Segregated liquidity"
        );
        Ok(result)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Pooled liquidity and shortfall with current balances.
    pub fn get_account_liquidity(&self, account: &AccountId) -> Result<AccountLiquidity, RiskError> {
        self.pooled_liquidity(account, None)
    }

    /// Pooled figures as if `redeem_tokens` were redeemed from and
    /// `borrow_amount` borrowed on `market`.
    pub fn get_hypothetical_account_liquidity(
        &self,
        account: &AccountId,
        market: &MarketId,
        redeem_tokens: u128,
        borrow_amount: u128,
    ) -> Result<AccountLiquidity, RiskError> {
        let h = Hypothetical {
            market: *market,
            redeem_tokens,
            borrow_amount,
        };
        self.pooled_liquidity(account, Some(&h))
    }

    pub fn get_segregated_account_liquidity(
        &self,
        account: &AccountId,
    ) -> Result<SegregatedLiquidity, RiskError> {
        self.segregated_liquidity(account, None)
    }

    pub fn get_hypothetical_segregated_account_liquidity(
        &self,
        account: &AccountId,
        market: &MarketId,
        redeem_tokens: u128,
        borrow_amount: u128,
    ) -> Result<SegregatedLiquidity, RiskError> {
        let h = Hypothetical {
            market: *market,
            redeem_tokens,
            borrow_amount,
        };
        self.segregated_liquidity(account, Some(&h))
    }

    /// Collateral tokens to seize for a repayment of `repay_amount`.
    pub fn liquidate_calculate_seize_tokens(
        &self,
        borrowed: &MarketId,
        collateral: &MarketId,
        repay_amount: u128,
    ) -> Result<u128, RiskError> {
        let collateral_market = self.markets.get(collateral).ok_or(RiskError::MarketNotListed)?;
        if !self.markets.contains_key(borrowed) {
            return Err(RiskError::MarketNotListed);
        }
        let price_borrowed = self.price_of(borrowed)?;
        let price_collateral = self.price_of(collateral)?;

        liquidation::seize_tokens(
            self.liquidation_incentive,
            price_borrowed,
            price_collateral,
            collateral_market.ledger.exchange_rate_stored(),
            repay_amount,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LedgerError;
    use lending_types::numeric::EXP_SCALE;
    use lending_types::errors::OracleError;
    use lending_types::risk::AccountSnapshot;

    struct StubLedger {
        id: MarketId,
        is_market: bool,
    }

    impl MarketLedger for StubLedger {
        fn market_id(&self) -> MarketId {
            self.id
        }
        fn is_market(&self) -> bool {
            self.is_market
        }
        fn risk_engine(&self) -> EngineId {
            EngineId::zero()
        }
        fn account_snapshot(&self, _: &AccountId) -> Result<AccountSnapshot, LedgerError> {
            Ok(AccountSnapshot {
                token_balance: 0,
                borrow_balance: 0,
                exchange_rate: Exp::ONE,
            })
        }
        fn borrow_balance_stored(&self, _: &AccountId) -> Result<u128, LedgerError> {
            Ok(0)
        }
        fn total_borrows(&self) -> u128 {
            0
        }
        fn exchange_rate_stored(&self) -> Exp {
            Exp::ONE
        }
        fn reserve_factor(&self) -> Exp {
            Exp::ZERO
        }
    }

    struct FlatPrice(u128);

    impl PriceSource for FlatPrice {
        fn underlying_price(&self, _: &MarketId) -> Result<UnderlyingPrice, OracleError> {
            Ok(UnderlyingPrice::from_mantissa(self.0))
        }
    }

    fn setup() -> (RiskEngine, AccountId, MarketId) {
        let admin = AccountId::new();
        let mut engine = RiskEngine::new(EngineId::new(), admin);
        let id = MarketId::new();
        engine
            .support_market(&admin, Arc::new(StubLedger { id, is_market: true }))
            .unwrap();
        (engine, admin, id)
    }

    #[test]
    fn test_defaults() {
        let engine = RiskEngine::new(EngineId::new(), AccountId::new());
        assert_eq!(engine.close_factor(), Exp::from_mantissa(EXP_SCALE / 2));
        assert!(!engine.segregation_mode());
        assert!(engine.all_markets().is_empty());
    }

    #[test]
    fn test_with_config_matches_defaults() {
        let id = EngineId::new();
        let admin = AccountId::new();
        let engine = RiskEngine::with_config(id, admin, &RiskEngineConfig::default()).unwrap();
        let plain = RiskEngine::new(id, admin);
        assert_eq!(engine.close_factor(), plain.close_factor());
        assert_eq!(engine.liquidation_incentive(), plain.liquidation_incentive());
    }

    #[test]
    fn test_support_market() {
        let (mut engine, admin, id) = setup();
        assert_eq!(engine.all_markets(), &[id]);
        assert_eq!(engine.market(&id), Some(&Market::listed(id)));

        let again = engine.support_market(&admin, Arc::new(StubLedger { id, is_market: true }));
        assert_eq!(again, Err(RiskError::MarketAlreadyListed));

        let impostor = engine.support_market(
            &admin,
            Arc::new(StubLedger { id: MarketId::new(), is_market: false }),
        );
        assert_eq!(impostor, Err(RiskError::NotMarket));

        let stranger = engine.support_market(
            &AccountId::new(),
            Arc::new(StubLedger { id: MarketId::new(), is_market: true }),
        );
        assert_eq!(stranger, Err(RiskError::Unauthorized));
    }

    #[test]
    fn test_collateral_factor_bounds() {
        let (mut engine, admin, id) = setup();

        let over = Exp::from_mantissa(MAX_COLLATERAL_FACTOR.mantissa() + 1);
        assert_eq!(
            engine.set_collateral_factor(&admin, &id, over),
            Err(RiskError::InvalidCollateralFactor)
        );

        // no oracle yet: only zero is accepted
        assert_eq!(
            engine.set_collateral_factor(&admin, &id, MAX_COLLATERAL_FACTOR),
            Err(RiskError::PriceError)
        );
        engine.set_collateral_factor(&admin, &id, Exp::ZERO).unwrap();

        engine.set_price_oracle(&admin, Arc::new(FlatPrice(0))).unwrap();
        assert_eq!(
            engine.set_collateral_factor(&admin, &id, MAX_COLLATERAL_FACTOR),
            Err(RiskError::PriceError)
        );

        engine.set_price_oracle(&admin, Arc::new(FlatPrice(EXP_SCALE))).unwrap();
        engine.set_collateral_factor(&admin, &id, MAX_COLLATERAL_FACTOR).unwrap();
        assert_eq!(engine.market(&id).unwrap().collateral_factor, MAX_COLLATERAL_FACTOR);

        assert_eq!(
            engine.set_collateral_factor(&admin, &MarketId::new(), Exp::ZERO),
            Err(RiskError::MarketNotListed)
        );
    }

    #[test]
    fn test_pause_guardian_cannot_resume() {
        let (mut engine, admin, id) = setup();
        let guardian = AccountId::new();
        engine.set_pause_guardian(&admin, Some(guardian)).unwrap();

        engine.set_action_paused(&guardian, &id, Action::Mint, true).unwrap();
        assert!(engine.market(&id).unwrap().is_paused(Action::Mint));
        assert_eq!(
            engine.set_action_paused(&guardian, &id, Action::Mint, false),
            Err(RiskError::Unauthorized)
        );
        engine.set_action_paused(&admin, &id, Action::Mint, false).unwrap();
        assert!(!engine.market(&id).unwrap().is_paused(Action::Mint));
    }

    #[test]
    fn test_borrow_caps_are_atomic() {
        let (mut engine, admin, id) = setup();
        let guardian = AccountId::new();
        engine.set_borrow_cap_guardian(&admin, Some(guardian)).unwrap();

        let result = engine.set_market_borrow_caps(&guardian, &[(id, 10), (MarketId::new(), 5)]);
        assert_eq!(result, Err(RiskError::MarketNotListed));
        assert_eq!(engine.market(&id).unwrap().borrow_cap, 0);

        engine.set_market_borrow_caps(&guardian, &[(id, 10)]).unwrap();
        assert_eq!(engine.market(&id).unwrap().borrow_cap, 10);

        assert_eq!(
            engine.set_market_borrow_caps(&AccountId::new(), &[(id, 1)]),
            Err(RiskError::Unauthorized)
        );
    }

    #[test]
    fn test_admin_only_setters() {
        let (mut engine, admin, id) = setup();
        let stranger = AccountId::new();

        assert_eq!(engine.set_close_factor(&stranger, Exp::ONE), Err(RiskError::Unauthorized));
        assert_eq!(
            engine.set_liquidation_incentive(&stranger, Exp::ONE),
            Err(RiskError::Unauthorized)
        );
        assert_eq!(
            engine.set_classification(&stranger, &id, Classification::TypeA),
            Err(RiskError::Unauthorized)
        );
        assert_eq!(engine.set_segregation_mode(&stranger, true), Err(RiskError::Unauthorized));
        assert_eq!(
            engine.set_pause_guardian(&stranger, Some(stranger)),
            Err(RiskError::Unauthorized)
        );

        engine.set_classification(&admin, &id, Classification::TypeB).unwrap();
        assert_eq!(engine.market(&id).unwrap().classification, Classification::TypeB);
        assert_eq!(
            engine.set_classification(&admin, &MarketId::new(), Classification::TypeA),
            Err(RiskError::MarketNotListed)
        );
    }

    #[test]
    fn test_transfer_admin() {
        let (mut engine, admin, _) = setup();
        let next = AccountId::new();
        engine.transfer_admin(&admin, next).unwrap();
        assert_eq!(engine.admin(), next);
        assert_eq!(engine.set_segregation_mode(&admin, true), Err(RiskError::Unauthorized));
    }

    #[test]
    fn test_enter_markets_reports_per_entry() {
        let (mut engine, _, id) = setup();
        let account = AccountId::new();
        let results = engine.enter_markets(account, &[id, MarketId::new(), id]);
        assert_eq!(results, vec![Ok(()), Err(RiskError::MarketNotListed), Ok(())]);
        assert_eq!(engine.assets_in(&account), &[id]);
        assert!(engine.check_membership(&account, &id));
    }

    #[test]
    fn test_admin_mutations_are_logged() {
        let (mut engine, admin, id) = setup();
        engine.set_segregation_mode(&admin, true).unwrap();
        engine.set_classification(&admin, &id, Classification::TypeA).unwrap();

        let kinds: Vec<_> = engine.drain_events().into_iter().map(|e| e.event_type).collect();
        assert_eq!(
            kinds,
            vec![
                RiskEventType::MarketListed { market: id },
                RiskEventType::SegregationModeToggled { enabled: true },
                RiskEventType::NewClassification {
                    market: id,
                    old: Classification::Unclassified,
                    new: Classification::TypeA,
                },
            ]
        );
        assert!(engine.events().is_empty());
    }

    #[test]
    fn test_no_oracle_is_price_error() {
        let (mut engine, _, id) = setup();
        let account = AccountId::new();
        engine.enter_markets(account, &[id]);
        assert_eq!(engine.get_account_liquidity(&account), Err(RiskError::PriceError));
    }
}
