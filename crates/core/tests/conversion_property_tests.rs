//! Property-based tests for display-currency conversion.
//!
//! These verify that conversion invariants hold across randomly generated
//! currencies and amounts, using the `proptest` crate.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use primevest_core::fx::{Currency, DisplayContext};

/// Generates a positive exchange rate with up to 4 decimal places,
/// spanning sub-unit rates (GBP-like) through large ones (KES-like).
fn arb_exchange_rate() -> impl Strategy<Value = Decimal> {
    (1i64..=2_000_000, 0u32..=4).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

/// Generates a non-negative display amount with 2 decimal places.
fn arb_display_amount() -> impl Strategy<Value = Decimal> {
    (0i64..=1_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn currency_with_rate(rate: Decimal) -> Currency {
    Currency {
        code: "TST".to_string(),
        name: "Test Currency".to_string(),
        symbol: "T".to_string(),
        exchange_rate: rate,
        is_active: true,
    }
}

proptest! {
    /// to_display(to_base(x)) returns within 0.01 of x for any active
    /// currency: base storage keeps full precision, so only the final
    /// display rounding can move the value.
    #[test]
    fn round_trip_display_base_display(
        rate in arb_exchange_rate(),
        amount in arb_display_amount(),
    ) {
        let ctx = DisplayContext::new(currency_with_rate(rate));

        let base = ctx.to_base(amount);
        let back = ctx.to_display(base);

        prop_assert!(
            (back - amount).abs() <= dec!(0.01),
            "{} -> {} -> {} (rate {})",
            amount,
            base,
            back,
            rate
        );
    }

    /// Display amounts always carry at most 2 decimal places.
    #[test]
    fn display_amounts_are_quantized(
        rate in arb_exchange_rate(),
        amount in arb_display_amount(),
    ) {
        let ctx = DisplayContext::new(currency_with_rate(rate));
        let display = ctx.to_display(amount);
        prop_assert!(display.scale() <= 2);
    }

    /// Conversion preserves sign and zero.
    #[test]
    fn conversion_preserves_zero(rate in arb_exchange_rate()) {
        let ctx = DisplayContext::new(currency_with_rate(rate));
        prop_assert_eq!(ctx.to_display(Decimal::ZERO), Decimal::ZERO);
        prop_assert_eq!(ctx.to_base(Decimal::ZERO), Decimal::ZERO);
    }

    /// The base-currency path is the identity apart from display rounding.
    #[test]
    fn base_currency_conversion_is_identity(amount in arb_display_amount()) {
        let ctx = DisplayContext::new(Currency::base());
        prop_assert_eq!(ctx.to_display(amount), amount);
        prop_assert_eq!(ctx.to_base(amount), amount);
    }
}
