use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::assets_model::{Asset, AssetCategory, NewAsset, RiskLevel};
use super::assets_traits::{AssetRepositoryTrait, AssetServiceTrait};
use crate::errors::{DatabaseError, Error, Result};

/// Service for the market asset catalog.
pub struct AssetService {
    repository: Arc<dyn AssetRepositoryTrait>,
}

impl AssetService {
    pub fn new(repository: Arc<dyn AssetRepositoryTrait>) -> Self {
        Self { repository }
    }

    /// Standard duration ladder offered on seeded assets.
    fn default_return_rates() -> BTreeMap<u32, Decimal> {
        BTreeMap::from([
            (1, dec!(0.5)),
            (3, dec!(1.5)),
            (6, dec!(3.0)),
            (12, dec!(6.0)),
            (24, dec!(12.0)),
        ])
    }

    fn default_assets() -> Vec<NewAsset> {
        let entries: [(&str, &str, AssetCategory, Decimal, Decimal, RiskLevel); 10] = [
            ("BTC", "Bitcoin", AssetCategory::Crypto, dec!(65000.00), dec!(10), RiskLevel::VeryHigh),
            ("ETH", "Ethereum", AssetCategory::Crypto, dec!(3500.00), dec!(10), RiskLevel::High),
            ("SOL", "Solana", AssetCategory::Crypto, dec!(150.00), dec!(10), RiskLevel::High),
            ("EURUSD", "EUR/USD", AssetCategory::Forex, dec!(1.08), dec!(50), RiskLevel::Low),
            ("GBPUSD", "GBP/USD", AssetCategory::Forex, dec!(1.26), dec!(50), RiskLevel::Low),
            ("XAUUSD", "Gold Futures", AssetCategory::Futures, dec!(2300.00), dec!(100), RiskLevel::Medium),
            ("CL", "Crude Oil WTI", AssetCategory::Futures, dec!(78.00), dec!(100), RiskLevel::High),
            ("AAPL", "Apple Inc.", AssetCategory::Stock, dec!(190.00), dec!(50), RiskLevel::Medium),
            ("TSLA", "Tesla Inc.", AssetCategory::Stock, dec!(175.00), dec!(50), RiskLevel::High),
            ("NVDA", "NVIDIA Corp.", AssetCategory::Stock, dec!(950.00), dec!(50), RiskLevel::High),
        ];

        entries
            .into_iter()
            .enumerate()
            .map(|(i, (symbol, name, category, price, min, risk))| NewAsset {
                symbol: symbol.to_string(),
                name: name.to_string(),
                category,
                current_price: price,
                min_investment: min,
                max_investment: dec!(100000),
                return_rates: Self::default_return_rates(),
                allowed_durations: vec![1, 3, 6, 12, 24],
                risk_level: risk,
                display_order: i as i32 + 1,
            })
            .collect()
    }
}

#[async_trait]
impl AssetServiceTrait for AssetService {
    fn get_asset(&self, asset_id: &str) -> Result<Asset> {
        self.repository.get_by_id(asset_id)
    }

    fn get_by_symbol(&self, symbol: &str) -> Result<Asset> {
        self.repository.get_by_symbol(symbol)
    }

    fn list_active_assets(&self) -> Result<Vec<Asset>> {
        self.repository.list(true)
    }

    fn get_return_rate(&self, asset: &Asset, duration_hours: u32) -> Decimal {
        asset.get_return_rate(duration_hours)
    }

    fn calculate_profit(&self, asset: &Asset, amount: Decimal, duration_hours: u32) -> Decimal {
        asset.calculate_profit(amount, duration_hours)
    }

    fn needs_refresh(&self, asset: &Asset, now: DateTime<Utc>) -> bool {
        asset.needs_refresh(now)
    }

    async fn create_asset(&self, new_asset: NewAsset) -> Result<Asset> {
        new_asset.validate()?;
        let asset = new_asset.into_asset(Utc::now());
        self.repository.insert(asset).await
    }

    async fn record_price(
        &self,
        asset_id: &str,
        new_price: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Asset> {
        let asset = self.repository.get_by_id(asset_id)?;
        let update = asset.price_update(new_price, now)?;
        self.repository.update_price(asset_id, update).await
    }

    async fn seed_defaults(&self) -> Result<usize> {
        let mut created = 0;
        for new_asset in Self::default_assets() {
            match self.repository.get_by_symbol(&new_asset.symbol) {
                Ok(_) => continue,
                Err(Error::Database(DatabaseError::NotFound(_))) => {
                    self.create_asset(new_asset).await?;
                    created += 1;
                }
                Err(e) => return Err(e),
            }
        }
        log::debug!("Seeded {} assets", created);
        Ok(created)
    }
}
