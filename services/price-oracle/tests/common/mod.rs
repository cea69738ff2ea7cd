//! Shared fixtures: in-memory feeds and a manual clock

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use lending_types::ids::{AccountId, AssetId, MarketId};
use price_oracle::feeds::{
    DeterministicFeed, FeedError, FeedPrice, ManualClock, ProbabilisticFeed, RoundData,
};
use price_oracle::{AssetPriceConfig, FeedHandle, OracleConfig, PriceDirection, PriceFeedId, PriceOracle};

pub const T0: u64 = 1_708_123_456;

/// Route oracle logs to the test harness output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[derive(Default)]
pub struct FakeDeterministic {
    rounds: Mutex<HashMap<FeedHandle, Result<RoundData, FeedError>>>,
}

impl FakeDeterministic {
    pub fn post(&self, handle: &FeedHandle, answer: i128, decimals: u8, updated_at: u64) {
        self.rounds.lock().unwrap().insert(
            handle.clone(),
            Ok(RoundData {
                answer,
                decimals,
                updated_at,
            }),
        );
    }

    pub fn fail(&self, handle: &FeedHandle) {
        self.rounds
            .lock()
            .unwrap()
            .insert(handle.clone(), Err(FeedError::CallFailed("reverted".into())));
    }
}

impl DeterministicFeed for FakeDeterministic {
    fn latest_round_data(&self, feed: &FeedHandle) -> Result<RoundData, FeedError> {
        self.rounds
            .lock()
            .unwrap()
            .get(feed)
            .cloned()
            .unwrap_or_else(|| Err(FeedError::UnknownFeed(feed.to_string())))
    }
}

#[derive(Default)]
pub struct FakeProbabilistic {
    quotes: Mutex<HashMap<PriceFeedId, FeedPrice>>,
}

impl FakeProbabilistic {
    pub fn post(&self, id: &PriceFeedId, price: i64, conf: u64, expo: i32, publish_time: u64) {
        self.quotes.lock().unwrap().insert(
            id.clone(),
            FeedPrice {
                price,
                conf,
                expo,
                publish_time,
            },
        );
    }
}

impl ProbabilisticFeed for FakeProbabilistic {
    fn price_unsafe(&self, id: &PriceFeedId) -> Result<FeedPrice, FeedError> {
        self.quotes
            .lock()
            .unwrap()
            .get(id)
            .copied()
            .ok_or_else(|| FeedError::UnknownFeed(id.to_string()))
    }
}

pub struct Harness {
    pub admin: AccountId,
    pub oracle: PriceOracle,
    pub deterministic: Arc<FakeDeterministic>,
    pub probabilistic: Arc<FakeProbabilistic>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(OracleConfig::default())
    }

    pub fn with_config(config: OracleConfig) -> Self {
        init_tracing();
        let admin = AccountId::new();
        let deterministic = Arc::new(FakeDeterministic::default());
        let probabilistic = Arc::new(FakeProbabilistic::default());
        let clock = Arc::new(ManualClock::new(T0));
        let oracle = PriceOracle::new(
            admin,
            deterministic.clone(),
            probabilistic.clone(),
            clock.clone(),
            config,
        );
        Self {
            admin,
            oracle,
            deterministic,
            probabilistic,
            clock,
        }
    }

    /// Configure a market and return it with its feed handles.
    pub fn configure(&mut self, base_unit: u128, direction: PriceDirection) -> (MarketId, AssetPriceConfig) {
        let market = MarketId::new();
        let config = asset_config(base_unit, direction);
        self.oracle
            .set_asset_configs(&self.admin, &[(market, config.clone())])
            .unwrap();
        (market, config)
    }
}

pub fn asset_config(base_unit: u128, direction: PriceDirection) -> AssetPriceConfig {
    let tag = AssetId::new();
    AssetPriceConfig {
        underlying: tag,
        base_unit,
        deterministic_feed: FeedHandle::new(format!("det-{tag}")),
        probabilistic_feed: PriceFeedId::new(format!("prob-{tag}")),
        max_price_age: 60,
        direction,
    }
}
