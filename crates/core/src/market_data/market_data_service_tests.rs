#[cfg(test)]
mod tests {
    use crate::assets::{Asset, AssetCategory, AssetServiceTrait, NewAsset, RiskLevel};
    use crate::errors::{DatabaseError, Error, Result};
    use crate::market_data::{MarketDataService, MarketDataServiceTrait, PriceProviderTrait};
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    // --- Mock AssetService ---
    struct MockAssetService {
        assets: Arc<Mutex<Vec<Asset>>>,
    }

    impl MockAssetService {
        fn new(assets: Vec<Asset>) -> Self {
            Self {
                assets: Arc::new(Mutex::new(assets)),
            }
        }
    }

    #[async_trait]
    impl AssetServiceTrait for MockAssetService {
        fn get_asset(&self, asset_id: &str) -> Result<Asset> {
            self.assets
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.id == asset_id)
                .cloned()
                .ok_or_else(|| Error::Database(DatabaseError::NotFound(asset_id.to_string())))
        }

        fn get_by_symbol(&self, symbol: &str) -> Result<Asset> {
            self.assets
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.symbol == symbol)
                .cloned()
                .ok_or_else(|| Error::Database(DatabaseError::NotFound(symbol.to_string())))
        }

        fn list_active_assets(&self) -> Result<Vec<Asset>> {
            Ok(self
                .assets
                .lock()
                .unwrap()
                .iter()
                .filter(|a| a.is_active)
                .cloned()
                .collect())
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

        async fn create_asset(&self, _new_asset: NewAsset) -> Result<Asset> {
            unimplemented!()
        }

        async fn record_price(
            &self,
            asset_id: &str,
            new_price: Decimal,
            now: DateTime<Utc>,
        ) -> Result<Asset> {
            let mut assets = self.assets.lock().unwrap();
            let asset = assets
                .iter_mut()
                .find(|a| a.id == asset_id)
                .ok_or_else(|| Error::Database(DatabaseError::NotFound(asset_id.to_string())))?;
            let update = asset.price_update(new_price, now)?;
            asset.previous_price = update.previous_price;
            asset.change_percentage = update.change_percentage;
            asset.current_price = update.current_price;
            asset.last_price_update = update.last_price_update;
            Ok(asset.clone())
        }

        async fn seed_defaults(&self) -> Result<usize> {
            unimplemented!()
        }
    }

    // --- Fixed-price provider ---
    struct FixedPriceProvider {
        price: Decimal,
    }

    impl PriceProviderTrait for FixedPriceProvider {
        fn latest_price(
            &self,
            _symbol: &str,
            _category: AssetCategory,
            _last_price: Option<Decimal>,
        ) -> Result<Decimal> {
            Ok(self.price)
        }
    }

    fn asset(id: &str, symbol: &str, age_secs: i64) -> Asset {
        let now = Utc::now();
        let mut asset = NewAsset {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            category: AssetCategory::Crypto,
            current_price: dec!(100),
            min_investment: dec!(10),
            max_investment: dec!(100000),
            return_rates: BTreeMap::from([(3, dec!(1.5))]),
            allowed_durations: vec![3],
            risk_level: RiskLevel::Medium,
            display_order: 1,
        }
        .into_asset(now);
        asset.id = id.to_string();
        asset.last_price_update = now - Duration::seconds(age_secs);
        asset
    }

    #[tokio::test]
    async fn test_refresh_stale_skips_fresh_assets() {
        let now = Utc::now();
        let assets = Arc::new(MockAssetService::new(vec![
            asset("a1", "BTC", 600),
            asset("a2", "ETH", 10),
        ]));
        let service = MarketDataService::new(
            Arc::new(FixedPriceProvider { price: dec!(110) }),
            assets.clone(),
        );

        let updated = service.refresh_stale(now).await.unwrap();
        assert_eq!(updated, 1);

        let stale = assets.get_asset("a1").unwrap();
        assert_eq!(stale.current_price, dec!(110));
        assert_eq!(stale.previous_price, dec!(100));

        let fresh = assets.get_asset("a2").unwrap();
        assert_eq!(fresh.current_price, dec!(100));
    }

    #[tokio::test]
    async fn test_refresh_stale_continues_after_failure() {
        let now = Utc::now();
        let assets = Arc::new(MockAssetService::new(vec![
            asset("a1", "BTC", 600),
            asset("a2", "ETH", 600),
        ]));
        // A non-positive oracle price is rejected per asset, not fatally.
        let service = MarketDataService::new(
            Arc::new(FixedPriceProvider {
                price: Decimal::ZERO,
            }),
            assets.clone(),
        );

        let updated = service.refresh_stale(now).await.unwrap();
        assert_eq!(updated, 0);
        assert_eq!(assets.get_asset("a1").unwrap().current_price, dec!(100));
    }

    #[tokio::test]
    async fn test_refresh_asset_ignores_staleness() {
        let now = Utc::now();
        let assets = Arc::new(MockAssetService::new(vec![asset("a1", "BTC", 0)]));
        let service = MarketDataService::new(
            Arc::new(FixedPriceProvider { price: dec!(105) }),
            assets.clone(),
        );

        let updated = service.refresh_asset("a1", now).await.unwrap();
        assert_eq!(updated.current_price, dec!(105));
        assert_eq!(updated.change_percentage, dec!(5));
    }
}
