//! The pricing seam between the risk engine and the oracle

use crate::errors::OracleError;
use crate::ids::MarketId;
use crate::numeric::UnderlyingPrice;

/// Anything that can price a market's underlying asset.
///
/// Implementations must recompute on every call; callers never cache.
pub trait PriceSource: Send + Sync {
    fn underlying_price(&self, market: &MarketId) -> Result<UnderlyingPrice, OracleError>;
}
