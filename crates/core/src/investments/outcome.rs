//! Settlement outcome strategies.
//!
//! The simulated market perturbs the expected profit at settlement time.
//! The strategy is injected so tests can pin the factor and operators can
//! reconfigure the bounds.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::errors::{Result, ValidationError};
use crate::Error;

/// Computes the realized profit/loss from the expected profit.
pub trait SettlementOutcomeTrait: Send + Sync {
    fn realize(&self, expected_profit: Decimal) -> Decimal;
}

/// Multiplies the expected profit by a factor drawn uniformly from
/// `[lower, upper]`. The factor is sampled in integer basis points so the
/// arithmetic never leaves `Decimal`.
pub struct UniformOutcome {
    lower: Decimal,
    upper: Decimal,
    rng: Mutex<StdRng>,
}

impl UniformOutcome {
    pub const DEFAULT_LOWER: Decimal = dec!(0.8);
    pub const DEFAULT_UPPER: Decimal = dec!(1.2);

    pub fn new(lower: Decimal, upper: Decimal) -> Result<Self> {
        if lower < Decimal::ZERO || upper < lower {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "invalid outcome bounds [{}, {}]",
                lower, upper
            ))));
        }
        Ok(Self {
            lower,
            upper,
            rng: Mutex::new(StdRng::from_entropy()),
        })
    }

    fn factor(&self) -> Decimal {
        let span_bps = ((self.upper - self.lower) * dec!(10000))
            .to_i64()
            .unwrap_or(0)
            .max(0);
        let offset = self.rng.lock().unwrap().gen_range(0..=span_bps);
        self.lower + Decimal::new(offset, 4)
    }
}

impl Default for UniformOutcome {
    fn default() -> Self {
        Self {
            lower: Self::DEFAULT_LOWER,
            upper: Self::DEFAULT_UPPER,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }
}

impl SettlementOutcomeTrait for UniformOutcome {
    fn realize(&self, expected_profit: Decimal) -> Decimal {
        expected_profit * self.factor()
    }
}

/// Pins the perturbation factor; used by tests and deterministic replays.
pub struct FixedOutcome(pub Decimal);

impl SettlementOutcomeTrait for FixedOutcome {
    fn realize(&self, expected_profit: Decimal) -> Decimal {
        expected_profit * self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_factor_stays_within_bounds() {
        let outcome = UniformOutcome::default();
        for _ in 0..500 {
            let realized = outcome.realize(dec!(100));
            assert!(realized >= dec!(80) && realized <= dec!(120));
        }
    }

    #[test]
    fn test_uniform_rejects_inverted_bounds() {
        assert!(UniformOutcome::new(dec!(1.2), dec!(0.8)).is_err());
        assert!(UniformOutcome::new(dec!(-0.1), dec!(1.0)).is_err());
    }

    #[test]
    fn test_fixed_outcome_is_exact() {
        let outcome = FixedOutcome(dec!(1.0));
        assert_eq!(outcome.realize(dec!(0.75)), dec!(0.75));

        let outcome = FixedOutcome(dec!(0.8));
        assert_eq!(outcome.realize(dec!(10)), dec!(8));
    }
}
