//! Price feed adapters
//!
//! Each source is read through a fallible adapter that folds every failure
//! mode (call error, non-positive price, stale timestamp, confidence too
//! wide) into a single [`Unusable`] outcome before selection runs.

use std::sync::atomic::{AtomicU64, Ordering};

use lending_types::numeric::{InternalPrice, BPS_DENOMINATOR};
use thiserror::Error;

use crate::config::{ConfidencePolicy, FeedHandle, PriceDirection, PriceFeedId};

/// Failure reported by a feed itself
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("unknown feed: {0}")]
    UnknownFeed(String),

    #[error("feed call failed: {0}")]
    CallFailed(String),
}

/// Latest round of a deterministic feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundData {
    /// Price with `decimals` fractional digits
    pub answer: i128,
    pub decimals: u8,
    /// Unix seconds
    pub updated_at: u64,
}

/// Latest quote of a probabilistic feed: `price × 10^expo ± conf × 10^expo`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedPrice {
    pub price: i64,
    pub conf: u64,
    pub expo: i32,
    /// Unix seconds
    pub publish_time: u64,
}

pub trait DeterministicFeed: Send + Sync {
    fn latest_round_data(&self, feed: &FeedHandle) -> Result<RoundData, FeedError>;
}

pub trait ProbabilisticFeed: Send + Sync {
    /// Latest quote without any freshness guarantee; the caller checks age.
    fn price_unsafe(&self, id: &PriceFeedId) -> Result<FeedPrice, FeedError>;
}

/// Source of "now" in unix seconds
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        chrono::Utc::now().timestamp().max(0) as u64
    }
}

/// Clock advanced by hand, for simulations and tests
#[derive(Debug, Default)]
pub struct ManualClock(AtomicU64);

impl ManualClock {
    pub fn new(now: u64) -> Self {
        Self(AtomicU64::new(now))
    }

    pub fn set(&self, now: u64) {
        self.0.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: u64) {
        self.0.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Which source a quote came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Deterministic,
    Probabilistic,
}

/// A usable, normalized quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedQuote {
    pub source: Source,
    pub price: InternalPrice,
    pub timestamp: u64,
}

/// Why a source was discarded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Unusable {
    #[error("feed call failed: {0}")]
    CallFailed(#[from] FeedError),

    #[error("non-positive price")]
    NonPositive,

    #[error("stale: updated at {updated_at}, oldest accepted {oldest_accepted}")]
    Stale { updated_at: u64, oldest_accepted: u64 },

    #[error("confidence {conf} too wide for price {price}")]
    ConfidenceTooWide { price: u128, conf: u128 },

    #[error("price out of range after rescaling")]
    OutOfRange,
}

fn check_fresh(updated_at: u64, now: u64, max_age: u64) -> Result<(), Unusable> {
    let oldest_accepted = now.saturating_sub(max_age);
    if updated_at < oldest_accepted {
        return Err(Unusable::Stale {
            updated_at,
            oldest_accepted,
        });
    }
    Ok(())
}

/// Read and normalize the deterministic source.
pub fn read_deterministic(
    feed: &dyn DeterministicFeed,
    handle: &FeedHandle,
    now: u64,
    max_age: u64,
) -> Result<FeedQuote, Unusable> {
    let round = feed.latest_round_data(handle)?;
    if round.answer <= 0 {
        return Err(Unusable::NonPositive);
    }
    check_fresh(round.updated_at, now, max_age)?;

    let price = InternalPrice::from_decimals(round.answer as u128, round.decimals)
        .map_err(|_| Unusable::OutOfRange)?;
    if price.is_zero() {
        return Err(Unusable::NonPositive);
    }
    Ok(FeedQuote {
        source: Source::Deterministic,
        price,
        timestamp: round.updated_at,
    })
}

/// Read, normalize and confidence-adjust the probabilistic source.
pub fn read_probabilistic(
    feed: &dyn ProbabilisticFeed,
    id: &PriceFeedId,
    now: u64,
    max_age: u64,
    direction: PriceDirection,
    policy: ConfidencePolicy,
) -> Result<FeedQuote, Unusable> {
    let quote = feed.price_unsafe(id)?;
    if quote.price <= 0 {
        return Err(Unusable::NonPositive);
    }
    check_fresh(quote.publish_time, now, max_age)?;

    let raw = InternalPrice::rescale(quote.price as u128, quote.expo)
        .map_err(|_| Unusable::OutOfRange)?;
    let conf = InternalPrice::rescale(quote.conf as u128, quote.expo)
        .map_err(|_| Unusable::OutOfRange)?;
    if raw.is_zero() {
        return Err(Unusable::NonPositive);
    }

    let price = match policy {
        ConfidencePolicy::Directional => {
            if conf >= raw {
                return Err(Unusable::ConfidenceTooWide {
                    price: raw.value(),
                    conf: conf.value(),
                });
            }
            match direction {
                PriceDirection::Collateral => raw.checked_sub(conf),
                PriceDirection::Borrowed => raw.checked_add(conf),
            }
            .map_err(|_| Unusable::OutOfRange)?
        }
        ConfidencePolicy::RatioThreshold { max_conf_bps } => {
            // compared in feed units so truncation cannot hide a wide band
            let lhs = (quote.conf as u128) * BPS_DENOMINATOR;
            let rhs = (quote.price as u128) * (max_conf_bps as u128);
            if lhs > rhs {
                return Err(Unusable::ConfidenceTooWide {
                    price: raw.value(),
                    conf: conf.value(),
                });
            }
            raw
        }
    };

    Ok(FeedQuote {
        source: Source::Probabilistic,
        price,
        timestamp: quote.publish_time,
    })
}
