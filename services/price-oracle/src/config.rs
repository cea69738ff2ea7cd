//! Oracle configuration
//!
//! Per-asset configuration is set only through an atomic admin batch; see
//! [`crate::oracle::PriceOracle::set_asset_configs`].

use lending_types::errors::OracleError;
use lending_types::ids::AssetId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of a deterministic (push/round-based) price feed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedHandle(String);

impl FeedHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeedHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a probabilistic (price + confidence) feed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceFeedId(String);

impl PriceFeedId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PriceFeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the asset is valued, which decides the direction of the confidence
/// adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceDirection {
    /// Conservative-low: `price − confidence`
    Collateral,
    /// Conservative-high: `price + confidence`
    Borrowed,
}

/// Treatment of the probabilistic source's confidence band.
///
/// The two policies are materially different and are chosen per
/// deployment; they are never combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ConfidencePolicy {
    /// Discard when `confidence ≥ price`; otherwise shift the price by the
    /// confidence in the asset's [`PriceDirection`].
    #[default]
    Directional,
    /// Discard when `confidence / price` exceeds `max_conf_bps`; no
    /// adjustment.
    RatioThreshold { max_conf_bps: u16 },
}

/// Oracle-wide settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleConfig {
    #[serde(default)]
    pub confidence_policy: ConfidencePolicy,
}

/// Pricing configuration of one market's underlying asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetPriceConfig {
    pub underlying: AssetId,
    /// `10^decimals` of the underlying asset
    pub base_unit: u128,
    pub deterministic_feed: FeedHandle,
    pub probabilistic_feed: PriceFeedId,
    /// Oldest acceptable feed timestamp, in seconds before now
    pub max_price_age: u64,
    pub direction: PriceDirection,
}

impl AssetPriceConfig {
    /// Structural validation; `index` locates the entry within its batch.
    pub fn validate(&self, index: usize) -> Result<(), OracleError> {
        let reason = if self.underlying.is_zero() {
            "underlying asset is zero"
        } else if self.base_unit == 0 {
            "base unit is zero"
        } else if self.max_price_age == 0 {
            "max price age is zero"
        } else {
            return Ok(());
        };
        Err(OracleError::InvalidConfiguration {
            index,
            reason: reason.to_string(),
        })
    }

    /// Parse a JSON batch entry.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
