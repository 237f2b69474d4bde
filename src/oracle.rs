use std::rc::Rc;

use crate::constants::{CANONICAL_DECIMALS, PRECISION};
use crate::error::EngineError;
use crate::math;

/// Latest answer of an external price feed, in the feed's own precision.
#[derive(Debug, Clone, Copy)]
pub struct FeedPrice {
    /// Signed raw price. Zero or negative answers are rejected by the
    /// adapter before any conversion runs.
    pub price: i128,
    /// Decimals of the feed's precision.
    pub decimals: u8,
    /// Unix timestamp of the answer.
    pub updated_at: i64,
}

/// Read capability of a single external price feed. Each registered asset
/// is backed by exactly one feed.
pub trait PriceFeed {
    fn latest_price(&self) -> FeedPrice;
}

/// Time source consulted only when a maximum price age is configured.
pub trait Clock {
    fn unix_timestamp(&self) -> i64;
}

struct StalenessPolicy {
    max_age_secs: i64,
    clock: Rc<dyn Clock>,
}

/// Normalizes feed answers to the canonical 18-decimal scale and converts
/// between native asset quantities and USD-equivalent value.
#[derive(Default)]
pub struct PriceOracleAdapter {
    staleness: Option<StalenessPolicy>,
}

impl PriceOracleAdapter {
    /// Adapter with no staleness policy: feed answers are taken at face
    /// value regardless of age.
    pub fn new() -> Self {
        Self { staleness: None }
    }

    /// Adapter that rejects feed answers older than `max_age_secs`.
    pub fn with_max_age(clock: Rc<dyn Clock>, max_age_secs: i64) -> Self {
        Self {
            staleness: Some(StalenessPolicy { max_age_secs, clock }),
        }
    }

    /// Read a feed and rescale its answer to the canonical 18-decimal base.
    pub fn scaled_price(&self, feed: &dyn PriceFeed) -> Result<u128, EngineError> {
        let answer = feed.latest_price();
        if answer.price <= 0 {
            return Err(EngineError::InvalidPrice);
        }
        if let Some(policy) = &self.staleness {
            let age = policy.clock.unix_timestamp().saturating_sub(answer.updated_at);
            if age > policy.max_age_secs {
                return Err(EngineError::StalePrice);
            }
        }

        let price = answer.price as u128;
        let scaled = if answer.decimals <= CANONICAL_DECIMALS {
            let factor = math::pow10((CANONICAL_DECIMALS - answer.decimals) as u32)?;
            price
                .checked_mul(factor)
                .ok_or(EngineError::ArithmeticOverflow)?
        } else {
            let factor = math::pow10((answer.decimals - CANONICAL_DECIMALS) as u32)?;
            price / factor
        };
        // A price that truncates to nothing is as unusable as a zero answer.
        if scaled == 0 {
            return Err(EngineError::InvalidPrice);
        }
        Ok(scaled)
    }

    /// USD value of `native_amount` (18-decimal) of the feed's asset.
    /// Division truncates toward zero.
    pub fn usd_value(&self, feed: &dyn PriceFeed, native_amount: u128) -> Result<u128, EngineError> {
        let scaled = self.scaled_price(feed)?;
        math::mul_div(scaled, native_amount, PRECISION)
    }

    /// Inverse conversion: the native amount worth `usd_amount`. Used to
    /// size liquidation seizures. Division truncates toward zero.
    pub fn native_amount_for_usd(
        &self,
        feed: &dyn PriceFeed,
        usd_amount: u128,
    ) -> Result<u128, EngineError> {
        let scaled = self.scaled_price(feed)?;
        math::mul_div(usd_amount, PRECISION, scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct StaticFeed {
        price: i128,
        decimals: u8,
        updated_at: i64,
    }

    impl PriceFeed for StaticFeed {
        fn latest_price(&self) -> FeedPrice {
            FeedPrice {
                price: self.price,
                decimals: self.decimals,
                updated_at: self.updated_at,
            }
        }
    }

    struct StaticClock {
        now: Cell<i64>,
    }

    impl Clock for StaticClock {
        fn unix_timestamp(&self) -> i64 {
            self.now.get()
        }
    }

    #[test]
    fn test_eight_decimal_feed_is_rescaled() {
        // $2000.00000000 on an 8-decimal feed.
        let feed = StaticFeed { price: 200_000_000_000, decimals: 8, updated_at: 0 };
        let adapter = PriceOracleAdapter::new();
        assert_eq!(adapter.scaled_price(&feed).unwrap(), 2_000 * PRECISION);

        // 15 units at $2000 are worth $30000.
        let value = adapter.usd_value(&feed, 15 * PRECISION).unwrap();
        assert_eq!(value, 30_000 * PRECISION);
    }

    #[test]
    fn test_wider_than_canonical_feed_is_truncated_down() {
        // 20 decimals: 2.5 is stored as 25 * 10^19.
        let feed = StaticFeed { price: 250_000_000_000_000_000_000, decimals: 20, updated_at: 0 };
        let adapter = PriceOracleAdapter::new();
        assert_eq!(adapter.scaled_price(&feed).unwrap(), 25 * PRECISION / 10);
    }

    #[test]
    fn test_inverse_conversion() {
        let feed = StaticFeed { price: 1_000_000_000, decimals: 8, updated_at: 0 }; // $10
        let adapter = PriceOracleAdapter::new();
        let native = adapter.native_amount_for_usd(&feed, 100 * PRECISION).unwrap();
        assert_eq!(native, 10 * PRECISION);
    }

    #[test]
    fn test_round_trip_within_one_truncation_unit() {
        let feed = StaticFeed { price: 123_456_789, decimals: 8, updated_at: 0 };
        let adapter = PriceOracleAdapter::new();
        let x = 7_777_777_777_777_777_777u128; // ~7.78 units
        let usd = adapter.usd_value(&feed, x).unwrap();
        let back = adapter.native_amount_for_usd(&feed, usd).unwrap();
        assert!(back <= x);
        assert!(x - back <= 1);
    }

    #[test]
    fn test_non_positive_price_is_fatal() {
        let adapter = PriceOracleAdapter::new();
        let zero = StaticFeed { price: 0, decimals: 8, updated_at: 0 };
        assert_eq!(adapter.scaled_price(&zero), Err(EngineError::InvalidPrice));
        let negative = StaticFeed { price: -1, decimals: 8, updated_at: 0 };
        assert_eq!(adapter.scaled_price(&negative), Err(EngineError::InvalidPrice));
    }

    #[test]
    fn test_price_truncating_to_zero_is_fatal() {
        // 1 raw unit on a 20-decimal feed scales below one 18-decimal unit.
        let feed = StaticFeed { price: 1, decimals: 20, updated_at: 0 };
        let adapter = PriceOracleAdapter::new();
        assert_eq!(adapter.scaled_price(&feed), Err(EngineError::InvalidPrice));
    }

    #[test]
    fn test_staleness_policy() {
        let clock = Rc::new(StaticClock { now: Cell::new(1_000) });
        let adapter = PriceOracleAdapter::with_max_age(clock.clone(), 60);

        let fresh = StaticFeed { price: 100_000_000, decimals: 8, updated_at: 950 };
        assert!(adapter.scaled_price(&fresh).is_ok());

        let stale = StaticFeed { price: 100_000_000, decimals: 8, updated_at: 900 };
        assert_eq!(adapter.scaled_price(&stale), Err(EngineError::StalePrice));

        // Without a policy the same answer is accepted.
        let lax = PriceOracleAdapter::new();
        assert!(lax.scaled_price(&stale).is_ok());
    }
}
