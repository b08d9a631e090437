//! Simulated price oracle.
//!
//! Generates plausible price movement without any network access: a fixed
//! base-price table per symbol, per-category volatility, and dampened
//! movement outside market hours. All arithmetic stays in `Decimal`; the
//! random movement is sampled in integer basis points.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{Timelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::super::market_data_traits::PriceProviderTrait;
use crate::assets::AssetCategory;
use crate::errors::Result;

const BPS: Decimal = dec!(10000);

/// Smallest price the simulator will emit.
const PRICE_FLOOR: Decimal = dec!(0.000001);

pub struct SimulatedPriceProvider {
    base_prices: HashMap<&'static str, Decimal>,
    rng: Mutex<StdRng>,
}

impl Default for SimulatedPriceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedPriceProvider {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Seeded constructor for deterministic tests.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            base_prices: Self::base_price_table(),
            rng: Mutex::new(rng),
        }
    }

    fn base_price_table() -> HashMap<&'static str, Decimal> {
        HashMap::from([
            // Cryptocurrencies
            ("BTC", dec!(65000.00)),
            ("ETH", dec!(3500.00)),
            ("BNB", dec!(600.00)),
            ("XRP", dec!(0.60)),
            ("ADA", dec!(0.50)),
            ("SOL", dec!(150.00)),
            ("DOT", dec!(7.00)),
            ("DOGE", dec!(0.15)),
            ("MATIC", dec!(0.80)),
            ("SHIB", dec!(0.000025)),
            // Forex
            ("EURUSD", dec!(1.08)),
            ("GBPUSD", dec!(1.26)),
            ("USDJPY", dec!(148.50)),
            ("USDCHF", dec!(0.88)),
            ("AUDUSD", dec!(0.66)),
            ("USDCAD", dec!(1.35)),
            // Futures
            ("XAUUSD", dec!(2300.00)),
            ("XAGUSD", dec!(26.50)),
            ("CL", dec!(78.00)),
            ("NG", dec!(2.50)),
            ("ES", dec!(5200.00)),
            ("NQ", dec!(18000.00)),
            ("YM", dec!(39000.00)),
            ("RTY", dec!(2000.00)),
            // Stocks
            ("AAPL", dec!(190.00)),
            ("TSLA", dec!(175.00)),
            ("AMZN", dec!(180.00)),
            ("MSFT", dec!(420.00)),
            ("GOOGL", dec!(155.00)),
            ("NVDA", dec!(950.00)),
        ])
    }

    /// Daily volatility per category, in basis points.
    fn volatility_bps(category: AssetCategory) -> i64 {
        match category {
            AssetCategory::Crypto => 300,
            AssetCategory::Forex => 50,
            AssetCategory::Futures => 100,
            AssetCategory::Stock => 150,
        }
    }

    fn fallback_base_price(&self, category: AssetCategory) -> Decimal {
        let range = match category {
            AssetCategory::Crypto => (dec!(0.01), dec!(50000)),
            AssetCategory::Forex => (dec!(0.5), dec!(200)),
            AssetCategory::Futures => (dec!(10), dec!(10000)),
            AssetCategory::Stock => (dec!(10), dec!(1000)),
        };
        let span_bps = ((range.1 - range.0) * BPS).to_i64().unwrap_or(0).max(0);
        let offset = self.rng.lock().unwrap().gen_range(0..=span_bps);
        range.0 + Decimal::new(offset, 4)
    }
}

impl PriceProviderTrait for SimulatedPriceProvider {
    fn latest_price(
        &self,
        symbol: &str,
        category: AssetCategory,
        last_price: Option<Decimal>,
    ) -> Result<Decimal> {
        let base_price = match last_price.filter(|p| *p > Decimal::ZERO) {
            Some(price) => price,
            None => match self.base_prices.get(symbol.to_uppercase().as_str()) {
                Some(price) => *price,
                None => self.fallback_base_price(category),
            },
        };

        let volatility = Self::volatility_bps(category);
        // Movement dampens outside market hours.
        let hour = Utc::now().hour();
        let max_bps = if (9..=17).contains(&hour) {
            volatility
        } else {
            volatility * 3 / 10
        };

        let movement_bps = self.rng.lock().unwrap().gen_range(-max_bps..=max_bps);
        let movement = Decimal::new(movement_bps, 4);
        let new_price = base_price * (Decimal::ONE + movement);

        Ok(new_price.max(PRICE_FLOOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prices_are_always_positive() {
        let provider = SimulatedPriceProvider::with_seed(7);
        for _ in 0..200 {
            let price = provider
                .latest_price("SHIB", AssetCategory::Crypto, None)
                .unwrap();
            assert!(price > Decimal::ZERO);
        }
    }

    #[test]
    fn test_movement_starts_from_last_price() {
        let provider = SimulatedPriceProvider::with_seed(7);
        let last = dec!(100);
        // Crypto volatility is 300 bps; even a full swing stays near the base.
        let price = provider
            .latest_price("BTC", AssetCategory::Crypto, Some(last))
            .unwrap();
        assert!(price >= dec!(97) && price <= dec!(103));
    }

    #[test]
    fn test_unknown_symbol_falls_back_to_category_range() {
        let provider = SimulatedPriceProvider::with_seed(7);
        let price = provider
            .latest_price("UNKNOWN", AssetCategory::Stock, None)
            .unwrap();
        assert!(price > Decimal::ZERO);
    }
}
