//! Price oracle: configuration store plus the price query
//!
//! Nothing is cached: every query re-reads both feeds.

use std::collections::HashMap;
use std::sync::Arc;

use lending_types::access::AccessControl;
use lending_types::errors::OracleError;
use lending_types::ids::{AccountId, MarketId};
use lending_types::numeric::UnderlyingPrice;
use lending_types::PriceSource;
use tracing::{debug, info, warn};

use crate::config::{AssetPriceConfig, OracleConfig};
use crate::feeds::{
    read_deterministic, read_probabilistic, Clock, DeterministicFeed, FeedQuote, ProbabilisticFeed,
    Unusable,
};
use crate::selection::select_quote;

pub struct PriceOracle {
    access: AccessControl,
    configs: HashMap<MarketId, AssetPriceConfig>,
    deterministic: Arc<dyn DeterministicFeed>,
    probabilistic: Arc<dyn ProbabilisticFeed>,
    clock: Arc<dyn Clock>,
    config: OracleConfig,
}

impl PriceOracle {
    pub fn new(
        admin: AccountId,
        deterministic: Arc<dyn DeterministicFeed>,
        probabilistic: Arc<dyn ProbabilisticFeed>,
        clock: Arc<dyn Clock>,
        config: OracleConfig,
    ) -> Self {
        info!(
            admin = %admin,
            policy = ?config.confidence_policy,
            "PriceOracle initialized"
        );
        Self {
            access: AccessControl::new(admin),
            configs: HashMap::new(),
            deterministic,
            probabilistic,
            clock,
            config,
        }
    }

    pub fn admin(&self) -> AccountId {
        self.access.admin()
    }

    pub fn transfer_admin(&mut self, caller: &AccountId, new_admin: AccountId) -> Result<(), OracleError> {
        if !self.access.transfer_admin(caller, new_admin) {
            return Err(OracleError::Unauthorized);
        }
        info!(new_admin = %new_admin, "Oracle admin transferred");
        Ok(())
    }

    /// Apply a batch of asset configurations. Admin-only.
    ///
    /// Every entry is validated before any is applied; the first invalid
    /// entry rejects the whole batch.
    pub fn set_asset_configs(
        &mut self,
        caller: &AccountId,
        entries: &[(MarketId, AssetPriceConfig)],
    ) -> Result<(), OracleError> {
        if !self.access.is_admin(caller) {
            return Err(OracleError::Unauthorized);
        }

        for (index, (market, config)) in entries.iter().enumerate() {
            if market.is_zero() {
                return Err(OracleError::InvalidConfiguration {
                    index,
                    reason: "market is zero".to_string(),
                });
            }
            config.validate(index)?;
        }

        for (market, config) in entries {
            info!(
                market = %market,
                underlying = %config.underlying,
                base_unit = config.base_unit,
                max_price_age = config.max_price_age,
                direction = ?config.direction,
                "Asset price config set"
            );
            self.configs.insert(*market, config.clone());
        }
        Ok(())
    }

    pub fn asset_config(&self, market: &MarketId) -> Option<&AssetPriceConfig> {
        self.configs.get(market)
    }

    /// Normalized, confidence-adjusted price of `market`'s underlying,
    /// rescaled to `internal × 1e30 / baseUnit`.
    pub fn get_underlying_price(&self, market: &MarketId) -> Result<UnderlyingPrice, OracleError> {
        let config = self
            .configs
            .get(market)
            .ok_or(OracleError::MarketNotConfigured)?;
        let now = self.clock.now();

        let deterministic = usable(
            market,
            read_deterministic(
                self.deterministic.as_ref(),
                &config.deterministic_feed,
                now,
                config.max_price_age,
            ),
        );
        let probabilistic = usable(
            market,
            read_probabilistic(
                self.probabilistic.as_ref(),
                &config.probabilistic_feed,
                now,
                config.max_price_age,
                config.direction,
                self.config.confidence_policy,
            ),
        );

        let chosen = select_quote(deterministic, probabilistic).ok_or_else(|| {
            warn!(market = %market, "No usable price source");
            OracleError::PriceNotFound
        })?;

        let price = chosen.price.to_underlying(config.base_unit)?;
        if price.is_zero() {
            return Err(OracleError::PriceNotFound);
        }

        debug!(
            market = %market,
            source = ?chosen.source,
            internal = %chosen.price,
            timestamp = chosen.timestamp,
            price = %price,
            "Price selected"
        );
        Ok(price)
    }
}

fn usable(market: &MarketId, quote: Result<FeedQuote, Unusable>) -> Option<FeedQuote> {
    match quote {
        Ok(q) => {
            debug!(
                market = %market,
                source = ?q.source,
                price = %q.price,
                timestamp = q.timestamp,
                "Source usable"
            );
            Some(q)
        }
        Err(reason) => {
            warn!(market = %market, reason = %reason, "Price source discarded");
            None
        }
    }
}

impl PriceSource for PriceOracle {
    fn underlying_price(&self, market: &MarketId) -> Result<UnderlyingPrice, OracleError> {
        self.get_underlying_price(market)
    }
}
