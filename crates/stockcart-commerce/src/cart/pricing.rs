//! Order summary calculations.

use crate::error::CommerceError;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Order discount, in basis points of the subtotal (5%).
pub const ORDER_DISCOUNT_BPS: u32 = 500;

/// Pricing breakdown for a cart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderSummary {
    /// Sum of unit price times quantity over all lines.
    pub subtotal: Money,
    /// Order discount.
    pub discount: Money,
    /// Subtotal minus discount.
    pub grand_total: Money,
}

impl OrderSummary {
    /// The summary of an empty cart.
    pub fn empty(currency: Currency) -> Self {
        Self {
            subtotal: Money::zero(currency),
            discount: Money::zero(currency),
            grand_total: Money::zero(currency),
        }
    }
}

/// Pure summary calculator.
///
/// Rounding: the discount is rounded half-up to the currency's minor unit and
/// the grand total is `subtotal - discount` exactly, so the two identities
/// `subtotal == sum(price * qty)` and `grand_total == subtotal - discount`
/// hold with no drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingEngine {
    currency: Currency,
}

impl PricingEngine {
    pub fn new(currency: Currency) -> Self {
        Self { currency }
    }

    /// Total for one line.
    pub fn line_total(&self, price: Money, quantity: i64) -> Result<Money, CommerceError> {
        self.check_currency(&price)?;
        price.try_multiply(quantity).ok_or(CommerceError::Overflow)
    }

    /// Summarize `(unit price, quantity)` pairs.
    pub fn summarize<I>(&self, lines: I) -> Result<OrderSummary, CommerceError>
    where
        I: IntoIterator<Item = (Money, i64)>,
    {
        let mut subtotal = Money::zero(self.currency);
        for (price, quantity) in lines {
            let total = self.line_total(price, quantity)?;
            subtotal = subtotal.try_add(&total).ok_or(CommerceError::Overflow)?;
        }

        let discount = subtotal
            .basis_points(ORDER_DISCOUNT_BPS)
            .ok_or(CommerceError::Overflow)?;
        let grand_total = subtotal
            .try_subtract(&discount)
            .ok_or(CommerceError::Overflow)?;

        Ok(OrderSummary {
            subtotal,
            discount,
            grand_total,
        })
    }

    fn check_currency(&self, price: &Money) -> Result<(), CommerceError> {
        if price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: price.currency.code().to_string(),
            });
        }
        Ok(())
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn usd(minor: i64) -> Money {
        Money::new(minor, Currency::USD)
    }

    #[test]
    fn test_empty_summary() {
        let summary = PricingEngine::default().summarize(Vec::<(Money, i64)>::new()).unwrap();
        assert_eq!(summary, OrderSummary::empty(Currency::USD));
    }

    #[test]
    fn test_five_percent_discount() {
        // 5 units at 100.00
        let summary = PricingEngine::default()
            .summarize([(usd(10_000), 5)])
            .unwrap();
        assert_eq!(summary.subtotal, usd(50_000));
        assert_eq!(summary.discount, usd(2_500));
        assert_eq!(summary.grand_total, usd(47_500));
    }

    #[test]
    fn test_discount_rounds_half_up() {
        // subtotal 0.30 -> discount 0.015 -> 0.02
        let summary = PricingEngine::default().summarize([(usd(10), 3)]).unwrap();
        assert_eq!(summary.discount, usd(2));
        assert_eq!(summary.grand_total, usd(28));
    }

    #[test]
    fn test_currency_mismatch() {
        let result = PricingEngine::default().summarize([
            (usd(100), 1),
            (Money::new(100, Currency::EUR), 1),
        ]);
        assert!(matches!(result, Err(CommerceError::CurrencyMismatch { .. })));
    }

    #[test]
    fn test_overflow_is_reported() {
        let result = PricingEngine::default().summarize([(usd(i64::MAX), 2)]);
        assert_eq!(result, Err(CommerceError::Overflow));
    }

    proptest! {
        #[test]
        fn pricing_identity_holds(
            lines in prop::collection::vec((0i64..1_000_000, 1i64..1_000), 0..20)
        ) {
            let engine = PricingEngine::default();
            let summary = engine
                .summarize(lines.iter().map(|&(price, qty)| (usd(price), qty)))
                .unwrap();

            let expected: i64 = lines.iter().map(|&(price, qty)| price * qty).sum();
            prop_assert_eq!(summary.subtotal.amount_minor, expected);
            prop_assert_eq!(
                summary.grand_total.amount_minor,
                summary.subtotal.amount_minor - summary.discount.amount_minor
            );

            // discount is 5% of subtotal to within half a minor unit
            let exact_times_100 = i128::from(expected) * 5;
            let diff = i128::from(summary.discount.amount_minor) * 100 - exact_times_100;
            prop_assert!(diff.abs() <= 50);
        }
    }
}
