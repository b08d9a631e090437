#[cfg(test)]
mod tests {
    use crate::fx::{Currency, CurrencyRepositoryTrait, DisplayPreference, FxService, FxServiceTrait};
    use crate::errors::Result;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    // --- Mock CurrencyRepository ---
    struct MockCurrencyRepository {
        currencies: Arc<Mutex<Vec<Currency>>>,
    }

    impl MockCurrencyRepository {
        fn new(currencies: Vec<Currency>) -> Self {
            Self {
                currencies: Arc::new(Mutex::new(currencies)),
            }
        }

        fn empty() -> Self {
            Self::new(Vec::new())
        }
    }

    #[async_trait]
    impl CurrencyRepositoryTrait for MockCurrencyRepository {
        fn get_by_code(&self, code: &str) -> Result<Option<Currency>> {
            Ok(self
                .currencies
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.code == code)
                .cloned())
        }

        fn list_active(&self) -> Result<Vec<Currency>> {
            Ok(self
                .currencies
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.is_active)
                .cloned()
                .collect())
        }

        async fn upsert(&self, currency: Currency) -> Result<Currency> {
            let mut currencies = self.currencies.lock().unwrap();
            currencies.retain(|c| c.code != currency.code);
            currencies.push(currency.clone());
            Ok(currency)
        }
    }

    fn currency(code: &str, symbol: &str, rate: Decimal, is_active: bool) -> Currency {
        Currency {
            code: code.to_string(),
            name: code.to_string(),
            symbol: symbol.to_string(),
            exchange_rate: rate,
            is_active,
        }
    }

    fn service_with(currencies: Vec<Currency>) -> FxService {
        let service = FxService::new(Arc::new(MockCurrencyRepository::new(currencies)));
        service.initialize().unwrap();
        service
    }

    #[test]
    fn test_wallet_preference_wins_over_client_hint() {
        let service = service_with(vec![
            Currency::base(),
            currency("KES", "KSh", dec!(160), true),
            currency("EUR", "€", dec!(0.92), true),
        ]);

        let preference = DisplayPreference {
            wallet_currency: Some("KES".to_string()),
            client_hint: Some("EUR".to_string()),
        };

        let ctx = service.get_display_currency(&preference);
        assert_eq!(ctx.currency().code, "KES");
    }

    #[test]
    fn test_unknown_code_falls_back_to_client_hint_then_base() {
        let service = service_with(vec![
            Currency::base(),
            currency("EUR", "€", dec!(0.92), true),
        ]);

        let preference = DisplayPreference {
            wallet_currency: Some("XXX".to_string()),
            client_hint: Some("EUR".to_string()),
        };
        let ctx = service.get_display_currency(&preference);
        assert_eq!(ctx.currency().code, "EUR");

        let preference = DisplayPreference {
            wallet_currency: Some("XXX".to_string()),
            client_hint: Some("YYY".to_string()),
        };
        let ctx = service.get_display_currency(&preference);
        assert_eq!(ctx.currency().code, "USD");
    }

    #[test]
    fn test_inactive_currency_is_skipped() {
        let service = service_with(vec![
            Currency::base(),
            currency("KES", "KSh", dec!(160), false),
        ]);

        let preference = DisplayPreference {
            wallet_currency: Some("KES".to_string()),
            client_hint: None,
        };
        let ctx = service.get_display_currency(&preference);
        assert_eq!(ctx.currency().code, "USD");
    }

    #[test]
    fn test_unseeded_registry_uses_builtin_base() {
        let service = FxService::new(Arc::new(MockCurrencyRepository::empty()));
        service.initialize().unwrap();

        let ctx = service.get_display_currency(&DisplayPreference::default());
        assert_eq!(ctx.currency().code, "USD");
        assert_eq!(ctx.currency().exchange_rate, Decimal::ONE);
    }

    #[test]
    fn test_display_conversion_kes() {
        let kes = currency("KES", "KSh", dec!(160), true);
        let service = service_with(vec![Currency::base(), kes.clone()]);

        assert_eq!(service.to_display(dec!(100), &kes), dec!(16000.00));
        assert_eq!(service.to_base(dec!(16000.00), &kes), dec!(100));
    }

    #[test]
    fn test_display_rounds_half_up() {
        let eur = currency("EUR", "€", dec!(0.92), true);
        let service = service_with(vec![Currency::base(), eur.clone()]);

        // Midpoint on the base path: half-up gives 10.01, banker's would give 10.00.
        let base = Currency::base();
        assert_eq!(service.to_display(dec!(10.005), &base), dec!(10.01));

        // 11.625 * 0.92 = 10.695, a midpoint after conversion.
        assert_eq!(service.to_display(dec!(11.625), &eur), dec!(10.70));
    }

    #[test]
    fn test_base_to_display_round_trip_within_tolerance() {
        let kes = currency("KES", "KSh", dec!(160), true);
        let service = service_with(vec![Currency::base(), kes.clone()]);

        for amount in [dec!(0.01), dec!(1), dec!(33.33), dec!(1234.56)] {
            let display = service.to_display(amount, &kes);
            let back = service.to_base(display, &kes);
            assert!((back - amount).abs() <= dec!(0.01), "{} -> {} -> {}", amount, display, back);
        }
    }

    #[tokio::test]
    async fn test_seed_defaults_is_idempotent() {
        let service = FxService::new(Arc::new(MockCurrencyRepository::empty()));

        let first = service.seed_defaults().await.unwrap();
        let second = service.seed_defaults().await.unwrap();
        assert_eq!(first, second);

        let active = service.list_active_currencies().unwrap();
        assert_eq!(active.len(), first);
        assert!(active.iter().any(|c| c.code == "KES"));
    }

    #[tokio::test]
    async fn test_upsert_rejects_non_positive_rate() {
        let service = FxService::new(Arc::new(MockCurrencyRepository::empty()));

        let bad = currency("ZWL", "Z$", dec!(0), true);
        assert!(service.upsert_currency(bad).await.is_err());
    }
}
