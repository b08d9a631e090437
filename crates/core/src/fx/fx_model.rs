//! Currency registry domain models.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::constants::{BASE_CURRENCY, DISPLAY_DECIMAL_PRECISION};
use crate::errors::{Result, ValidationError};
use crate::fx::FxError;
use crate::Error;

/// A currency known to the registry.
///
/// `exchange_rate` is expressed as base units of this currency per 1 unit of
/// the ledger base currency. The base currency itself always carries a rate
/// of exactly 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub exchange_rate: Decimal,
    pub is_active: bool,
}

impl Currency {
    /// Built-in base currency, used when the registry has not been seeded.
    pub fn base() -> Self {
        Currency {
            code: BASE_CURRENCY.to_string(),
            name: "US Dollar".to_string(),
            symbol: "$".to_string(),
            exchange_rate: Decimal::ONE,
            is_active: true,
        }
    }

    pub fn is_base(&self) -> bool {
        self.code == BASE_CURRENCY
    }

    pub fn validate(&self) -> Result<()> {
        if self.code.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Currency code cannot be empty".to_string(),
            )));
        }
        if self.exchange_rate <= Decimal::ZERO {
            return Err(FxError::InvalidExchangeRate(format!(
                "{}: rate must be positive, got {}",
                self.code, self.exchange_rate
            ))
            .into());
        }
        if self.is_base() && self.exchange_rate != Decimal::ONE {
            return Err(FxError::InvalidExchangeRate(format!(
                "base currency rate must be 1, got {}",
                self.exchange_rate
            ))
            .into());
        }
        Ok(())
    }
}

/// Caller-supplied hints for resolving a display currency.
///
/// Priority order: explicit wallet preference, then client hint (e.g. a
/// stored cookie), then the base currency.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPreference {
    pub wallet_currency: Option<String>,
    pub client_hint: Option<String>,
}

impl DisplayPreference {
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        self.wallet_currency
            .as_deref()
            .into_iter()
            .chain(self.client_hint.as_deref())
    }
}

/// The display currency resolved once per request and threaded explicitly
/// into every call that needs display conversion.
///
/// Base-currency storage is the single source of truth: display values are
/// re-derived from base amounts, never the other way around. Converting
/// display -> base -> display may differ in the last cent due to display
/// rounding; this is an accepted lossy edge.
#[derive(Debug, Clone)]
pub struct DisplayContext {
    currency: Currency,
}

impl DisplayContext {
    pub fn new(currency: Currency) -> Self {
        DisplayContext { currency }
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Converts a base-currency amount to the display currency, rounded to
    /// 2 places using round-half-up.
    ///
    /// The base-currency path skips the multiplication: the rate is always 1
    /// but the explicit branch keeps stored amounts untouched apart from the
    /// display rounding.
    pub fn to_display(&self, amount_base: Decimal) -> Decimal {
        let amount = if self.currency.is_base() {
            amount_base
        } else {
            amount_base * self.currency.exchange_rate
        };
        amount.round_dp_with_strategy(
            DISPLAY_DECIMAL_PRECISION,
            RoundingStrategy::MidpointAwayFromZero,
        )
    }

    /// Converts a display-currency amount back to the base currency at full
    /// precision. Only display values are ever rounded.
    pub fn to_base(&self, amount_display: Decimal) -> Decimal {
        if self.currency.is_base() {
            return amount_display;
        }
        amount_display / self.currency.exchange_rate
    }
}
