//! Shared fixtures: an in-memory market ledger and a fixed price table

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use lending_types::errors::OracleError;
use lending_types::ids::{AccountId, EngineId, MarketId};
use lending_types::market::Classification;
use lending_types::numeric::{Exp, UnderlyingPrice, EXP_SCALE};
use lending_types::risk::AccountSnapshot;
use lending_types::PriceSource;
use risk_engine::{LedgerError, MarketLedger, RiskEngine};

/// Route engine logs to the test harness output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// `n` whole units at the 1e18 scale
pub fn units(n: u128) -> u128 {
    n * EXP_SCALE
}

pub fn exp(num: u128, den: u128) -> Exp {
    Exp::from_ratio(num, den).unwrap()
}

#[derive(Debug, Clone, Copy, Default)]
struct Balances {
    tokens: u128,
    borrows: u128,
}

pub struct MockMarket {
    id: MarketId,
    engine: EngineId,
    balances: Mutex<HashMap<AccountId, Balances>>,
    exchange_rate: Mutex<Exp>,
    total_borrows: Mutex<u128>,
    reserve_factor: Mutex<Exp>,
    failing: AtomicBool,
}

impl MockMarket {
    pub fn new(engine: EngineId) -> Self {
        Self {
            id: MarketId::new(),
            engine,
            balances: Mutex::new(HashMap::new()),
            exchange_rate: Mutex::new(Exp::ONE),
            total_borrows: Mutex::new(0),
            reserve_factor: Mutex::new(Exp::ZERO),
            failing: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> MarketId {
        self.id
    }

    pub fn set_tokens(&self, account: AccountId, tokens: u128) {
        self.balances.lock().unwrap().entry(account).or_default().tokens = tokens;
    }

    pub fn set_borrow(&self, account: AccountId, borrows: u128) {
        self.balances.lock().unwrap().entry(account).or_default().borrows = borrows;
    }

    pub fn set_exchange_rate(&self, rate: Exp) {
        *self.exchange_rate.lock().unwrap() = rate;
    }

    pub fn set_total_borrows(&self, total: u128) {
        *self.total_borrows.lock().unwrap() = total;
    }

    pub fn set_reserve_factor(&self, factor: Exp) {
        *self.reserve_factor.lock().unwrap() = factor;
    }

    pub fn fail_snapshots(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn balances(&self, account: &AccountId) -> Balances {
        self.balances
            .lock()
            .unwrap()
            .get(account)
            .copied()
            .unwrap_or_default()
    }
}

impl MarketLedger for MockMarket {
    fn market_id(&self) -> MarketId {
        self.id
    }

    fn risk_engine(&self) -> EngineId {
        self.engine
    }

    fn account_snapshot(&self, account: &AccountId) -> Result<AccountSnapshot, LedgerError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(LedgerError::Unavailable("books locked".into()));
        }
        let b = self.balances(account);
        Ok(AccountSnapshot {
            token_balance: b.tokens,
            borrow_balance: b.borrows,
            exchange_rate: *self.exchange_rate.lock().unwrap(),
        })
    }

    fn borrow_balance_stored(&self, account: &AccountId) -> Result<u128, LedgerError> {
        Ok(self.balances(account).borrows)
    }

    fn total_borrows(&self) -> u128 {
        *self.total_borrows.lock().unwrap()
    }

    fn exchange_rate_stored(&self) -> Exp {
        *self.exchange_rate.lock().unwrap()
    }

    fn reserve_factor(&self) -> Exp {
        *self.reserve_factor.lock().unwrap()
    }
}

/// Price table keyed by market; missing entries are "not configured"
#[derive(Default)]
pub struct FixedPrices {
    prices: Mutex<HashMap<MarketId, u128>>,
}

impl FixedPrices {
    pub fn set(&self, market: MarketId, mantissa: u128) {
        self.prices.lock().unwrap().insert(market, mantissa);
    }

    pub fn remove(&self, market: &MarketId) {
        self.prices.lock().unwrap().remove(market);
    }
}

impl PriceSource for FixedPrices {
    fn underlying_price(&self, market: &MarketId) -> Result<UnderlyingPrice, OracleError> {
        self.prices
            .lock()
            .unwrap()
            .get(market)
            .map(|&m| UnderlyingPrice::from_mantissa(m))
            .ok_or(OracleError::MarketNotConfigured)
    }
}

pub struct Harness {
    pub admin: AccountId,
    pub engine: RiskEngine,
    pub prices: Arc<FixedPrices>,
}

impl Harness {
    pub fn new() -> Self {
        init_tracing();
        let admin = AccountId::new();
        let mut engine = RiskEngine::new(EngineId::new(), admin);
        let prices = Arc::new(FixedPrices::default());
        engine.set_price_oracle(&admin, prices.clone()).unwrap();
        Self {
            admin,
            engine,
            prices,
        }
    }

    /// List a market priced at `price` (1e18 mantissa) with factor `cf`.
    pub fn list(&mut self, price: u128, cf: Exp, class: Classification) -> Arc<MockMarket> {
        let market = Arc::new(MockMarket::new(self.engine.id()));
        self.engine.support_market(&self.admin, market.clone()).unwrap();
        self.prices.set(market.id(), price);
        self.engine
            .set_collateral_factor(&self.admin, &market.id(), cf)
            .unwrap();
        self.engine
            .set_classification(&self.admin, &market.id(), class)
            .unwrap();
        market
    }

    pub fn segregate(&mut self, enabled: bool) {
        self.engine.set_segregation_mode(&self.admin, enabled).unwrap();
    }

    /// Record a deposit: ledger balance plus the engine's mint hook.
    pub fn deposit(&mut self, market: &MockMarket, account: AccountId, tokens: u128) {
        self.engine.mint_allowed(&market.id(), &account, tokens).unwrap();
        market.set_tokens(account, tokens);
    }
}
