#[cfg(test)]
mod tests {
    use crate::assets::{Asset, AssetCategory, NewAsset, RiskLevel};
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn sample_new_asset() -> NewAsset {
        NewAsset {
            symbol: "BTC".to_string(),
            name: "Bitcoin".to_string(),
            category: AssetCategory::Crypto,
            current_price: dec!(65000),
            min_investment: dec!(10),
            max_investment: dec!(100000),
            return_rates: BTreeMap::from([(1, dec!(0.5)), (3, dec!(1.5)), (24, dec!(12.0))]),
            allowed_durations: vec![1, 3, 24],
            risk_level: RiskLevel::VeryHigh,
            display_order: 1,
        }
    }

    fn sample_asset() -> Asset {
        sample_new_asset().into_asset(Utc::now())
    }

    #[test]
    fn test_return_rate_lookup() {
        let asset = sample_asset();
        assert_eq!(asset.get_return_rate(3), dec!(1.5));
        // Unsupported durations yield zero, never an error.
        assert_eq!(asset.get_return_rate(48), Decimal::ZERO);
    }

    #[test]
    fn test_calculate_profit() {
        let asset = sample_asset();
        assert_eq!(asset.calculate_profit(dec!(50), 3), dec!(0.75));
        assert_eq!(asset.calculate_profit(dec!(100), 24), dec!(12));
        assert_eq!(asset.calculate_profit(dec!(100), 48), Decimal::ZERO);
    }

    #[test]
    fn test_needs_refresh_boundary() {
        let now = Utc::now();
        let mut asset = sample_asset();

        asset.last_price_update = now - Duration::seconds(299);
        assert!(!asset.needs_refresh(now));

        asset.last_price_update = now - Duration::seconds(301);
        assert!(asset.needs_refresh(now));
    }

    #[test]
    fn test_price_update_derives_change() {
        let now = Utc::now();
        let mut asset = sample_asset();
        asset.current_price = dec!(100);

        let update = asset.price_update(dec!(110), now).unwrap();
        assert_eq!(update.current_price, dec!(110));
        assert_eq!(update.previous_price, dec!(100));
        assert_eq!(update.change_percentage, dec!(10));
    }

    #[test]
    fn test_price_update_rejects_non_positive() {
        let asset = sample_asset();
        assert!(asset.price_update(Decimal::ZERO, Utc::now()).is_err());
        assert!(asset.price_update(dec!(-1), Utc::now()).is_err());
    }

    #[test]
    fn test_validate_rejects_missing_return_rate() {
        let mut new_asset = sample_new_asset();
        new_asset.allowed_durations.push(6);
        let err = new_asset.validate().unwrap_err();
        assert!(err.to_string().contains("6h"));
    }

    #[test]
    fn test_validate_rejects_inverted_limits() {
        let mut new_asset = sample_new_asset();
        new_asset.max_investment = dec!(5);
        assert!(new_asset.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_price() {
        let mut new_asset = sample_new_asset();
        new_asset.current_price = Decimal::ZERO;
        assert!(new_asset.validate().is_err());
    }
}
