//! Money type for representing monetary values.
//!
//! Uses minor-unit integer representation (cents for USD) so that sums and
//! products are exact. The only place a rounding decision is made is
//! [`Money::basis_points`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
    INR,
    NPR,
}

impl Currency {
    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::INR => "INR",
            Currency::NPR => "NPR",
        }
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::JPY => "\u{00a5}",
            Currency::INR => "\u{20b9}",
            Currency::NPR => "Rs.",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            "INR" => Some(Currency::INR),
            "NPR" => Some(Currency::NPR),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (e.g., cents for USD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit (e.g., cents).
    pub amount_minor: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount_minor: i64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    /// Create a Money value from whole major units (e.g., dollars).
    pub fn from_major(amount: i64, currency: Currency) -> Option<Self> {
        let multiplier = 10_i64.pow(currency.decimal_places());
        amount
            .checked_mul(multiplier)
            .map(|minor| Self::new(minor, currency))
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_minor < 0
    }

    /// Format as a display string (e.g., "$49.99").
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format as a display string without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let places = self.currency.decimal_places();
        if places == 0 {
            return self.amount_minor.to_string();
        }
        let divisor = 10_i64.pow(places);
        let sign = if self.amount_minor < 0 { "-" } else { "" };
        let abs = self.amount_minor.unsigned_abs();
        let divisor = divisor as u64;
        format!(
            "{sign}{}.{:0width$}",
            abs / divisor,
            abs % divisor,
            width = places as usize
        )
    }

    /// Try to add another Money value, returning None on currency mismatch
    /// or overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_minor
            .checked_add(other.amount_minor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Try to subtract another Money value.
    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_minor
            .checked_sub(other.amount_minor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Multiply by a scalar, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_minor
            .checked_mul(factor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Take `bps` basis points (1/100 of a percent) of this amount.
    ///
    /// Rounds half away from zero to the currency's minor unit.
    pub fn basis_points(&self, bps: u32) -> Option<Money> {
        let scaled = i128::from(self.amount_minor) * i128::from(bps);
        let half = if scaled < 0 { -5_000 } else { 5_000 };
        let rounded = (scaled + half) / 10_000;
        i64::try_from(rounded)
            .ok()
            .map(|amount| Money::new(amount, self.currency))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_major() {
        let m = Money::from_major(100, Currency::USD).unwrap();
        assert_eq!(m.amount_minor, 10_000);

        let m = Money::from_major(100, Currency::JPY).unwrap();
        assert_eq!(m.amount_minor, 100);

        assert!(Money::from_major(i64::MAX, Currency::USD).is_none());
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(4999, Currency::USD).display(), "$49.99");
        assert_eq!(Money::new(5, Currency::USD).display(), "$0.05");
        assert_eq!(Money::new(-250, Currency::EUR).display_amount(), "-2.50");
        assert_eq!(Money::new(100, Currency::JPY).display(), "\u{00a5}100");
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Money::new(1000, Currency::USD);
        let b = Money::new(300, Currency::USD);
        assert_eq!(a.try_add(&b).unwrap().amount_minor, 1300);
        assert_eq!(a.try_subtract(&b).unwrap().amount_minor, 700);
        assert_eq!(a.try_multiply(3).unwrap().amount_minor, 3000);
        assert!(Money::new(i64::MAX, Currency::USD).try_multiply(2).is_none());
    }

    #[test]
    fn test_currency_mismatch_is_none() {
        let usd = Money::new(1000, Currency::USD);
        let eur = Money::new(1000, Currency::EUR);
        assert!(usd.try_add(&eur).is_none());
        assert!(usd.try_subtract(&eur).is_none());
    }

    #[test]
    fn test_basis_points_rounding() {
        // 5% of $100.00
        assert_eq!(Money::new(10_000, Currency::USD).basis_points(500).unwrap().amount_minor, 500);
        // 5% of 10 cents is exactly half a cent: rounds up
        assert_eq!(Money::new(10, Currency::USD).basis_points(500).unwrap().amount_minor, 1);
        // 5% of 9 cents = 0.45 cents: rounds down
        assert_eq!(Money::new(9, Currency::USD).basis_points(500).unwrap().amount_minor, 0);
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("USD"), Some(Currency::USD));
        assert_eq!(Currency::from_code("npr"), Some(Currency::NPR));
        assert_eq!(Currency::from_code("INVALID"), None);
    }
}
