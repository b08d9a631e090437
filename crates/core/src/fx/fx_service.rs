use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::fx_errors::FxError;
use super::fx_model::{Currency, DisplayContext, DisplayPreference};
use super::fx_traits::{CurrencyRepositoryTrait, FxServiceTrait};
use crate::constants::BASE_CURRENCY;
use crate::errors::Result;

/// Currency registry backed by a repository, with an in-memory cache of
/// active currencies for request-path lookups.
#[derive(Clone)]
pub struct FxService {
    repository: Arc<dyn CurrencyRepositoryTrait>,
    cache: Arc<RwLock<HashMap<String, Currency>>>,
}

impl FxService {
    pub fn new(repository: Arc<dyn CurrencyRepositoryTrait>) -> Self {
        Self {
            repository,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn reload_cache(&self) -> Result<()> {
        let active = self.repository.list_active()?;
        let mut cache = self
            .cache
            .write()
            .map_err(|e| FxError::CacheError(e.to_string()))?;
        cache.clear();
        for currency in active {
            cache.insert(currency.code.clone(), currency);
        }
        Ok(())
    }

    /// Looks up an active currency, trying the cache before the repository.
    fn lookup_active(&self, code: &str) -> Option<Currency> {
        if let Ok(cache) = self.cache.read() {
            if let Some(currency) = cache.get(code) {
                return Some(currency.clone());
            }
        }

        match self.repository.get_by_code(code) {
            Ok(Some(currency)) if currency.is_active => {
                if let Ok(mut cache) = self.cache.write() {
                    cache.insert(currency.code.clone(), currency.clone());
                }
                Some(currency)
            }
            Ok(_) => None,
            Err(e) => {
                log::warn!("Currency lookup for '{}' failed: {}", code, e);
                None
            }
        }
    }

    /// Operator defaults, applied by `seed_defaults`.
    fn default_currencies() -> Vec<Currency> {
        vec![
            Currency {
                code: "USD".to_string(),
                name: "US Dollar".to_string(),
                symbol: "$".to_string(),
                exchange_rate: Decimal::ONE,
                is_active: true,
            },
            Currency {
                code: "KES".to_string(),
                name: "Kenyan Shilling".to_string(),
                symbol: "KSh".to_string(),
                exchange_rate: dec!(160.0000),
                is_active: true,
            },
            Currency {
                code: "EUR".to_string(),
                name: "Euro".to_string(),
                symbol: "€".to_string(),
                exchange_rate: dec!(0.9200),
                is_active: true,
            },
            Currency {
                code: "GBP".to_string(),
                name: "British Pound".to_string(),
                symbol: "£".to_string(),
                exchange_rate: dec!(0.7900),
                is_active: true,
            },
        ]
    }
}

#[async_trait]
impl FxServiceTrait for FxService {
    fn initialize(&self) -> Result<()> {
        self.reload_cache()
    }

    fn get_display_currency(&self, preference: &DisplayPreference) -> DisplayContext {
        for code in preference.candidates() {
            if let Some(currency) = self.lookup_active(code) {
                return DisplayContext::new(currency);
            }
            log::debug!(
                "Requested display currency '{}' is unknown or inactive, trying next candidate",
                code
            );
        }

        match self.lookup_active(BASE_CURRENCY) {
            Some(base) => DisplayContext::new(base),
            None => {
                log::warn!("Base currency is not seeded, using built-in fallback");
                DisplayContext::new(Currency::base())
            }
        }
    }

    fn to_display(&self, amount_base: Decimal, currency: &Currency) -> Decimal {
        DisplayContext::new(currency.clone()).to_display(amount_base)
    }

    fn to_base(&self, amount_display: Decimal, currency: &Currency) -> Decimal {
        DisplayContext::new(currency.clone()).to_base(amount_display)
    }

    fn list_active_currencies(&self) -> Result<Vec<Currency>> {
        self.repository.list_active()
    }

    async fn upsert_currency(&self, currency: Currency) -> Result<Currency> {
        currency.validate()?;
        let saved = self.repository.upsert(currency).await?;
        self.reload_cache()?;
        Ok(saved)
    }

    async fn seed_defaults(&self) -> Result<usize> {
        let defaults = Self::default_currencies();
        let count = defaults.len();
        for currency in defaults {
            self.repository.upsert(currency).await?;
        }
        self.reload_cache()?;
        log::debug!("Seeded {} currencies", count);
        Ok(count)
    }
}
