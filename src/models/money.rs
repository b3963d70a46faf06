//! Money type for currency amounts
//!
//! Amounts are whole cents in an `i64`, so adding bills and splitting the
//! remainder into buckets is exact. Percentages and remote amounts pass
//! through `rust_decimal::Decimal` and are rounded back to the cent.

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub};
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest magnitude accepted from text or decimal input: one trillion currency units
pub const MAX_INPUT_CENTS: i64 = 100_000_000_000_000;

/// A monetary amount in cents
///
/// Serializes as the bare cent count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

/// Why a money string was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyParseError {
    #[error("empty amount")]
    Empty,
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("'{0}' is out of range")]
    OutOfRange(String),
}

impl Money {
    /// ```
    /// use fortnight_cli::models::Money;
    /// assert_eq!(Money::from_cents(1050).to_string(), "$10.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Parse a user-entered amount: "120", "120.5", "$120.50", "-12.05"
    ///
    /// A bare number is whole currency units. More than two decimals are
    /// rounded to the cent. Magnitudes above [`MAX_INPUT_CENTS`] are rejected.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(MoneyParseError::Empty);
        }

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, trimmed),
        };
        let digits = unsigned.strip_prefix('$').unwrap_or(unsigned);
        if digits.starts_with(['-', '+']) {
            return Err(MoneyParseError::NotANumber(trimmed.to_string()));
        }

        let amount = Decimal::from_str(digits)
            .map_err(|_| MoneyParseError::NotANumber(trimmed.to_string()))?;
        let amount = if negative { -amount } else { amount };

        Self::from_decimal(amount).ok_or_else(|| MoneyParseError::OutOfRange(trimmed.to_string()))
    }

    /// Convert an exact decimal amount of currency units into cents
    ///
    /// Fractions of a cent are rounded half away from zero. Returns `None`
    /// when the magnitude exceeds [`MAX_INPUT_CENTS`].
    pub fn from_decimal(amount: Decimal) -> Option<Self> {
        amount
            .checked_mul(Decimal::ONE_HUNDRED)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .filter(|cents| cents.unsigned_abs() <= MAX_INPUT_CENTS as u64)
            .map(Self)
    }

    /// The amount in currency units as an exact decimal
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Take `pct` percent of this amount, rounded to the cent
    ///
    /// ```
    /// use fortnight_cli::models::Money;
    /// use rust_decimal::Decimal;
    /// let fire = Money::from_cents(70000).percent_of(Decimal::from(30)).unwrap();
    /// assert_eq!(fire.cents(), 21000);
    /// ```
    pub fn percent_of(&self, pct: Decimal) -> Option<Self> {
        let cents = Decimal::from(self.0).checked_mul(pct)? / Decimal::ONE_HUNDRED;
        cents
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .map(Self)
    }

    /// Decimal rendering without a currency symbol ("-12.05")
    pub fn to_plain_string(&self) -> String {
        self.format_with_symbol("")
    }

    /// Render with a currency symbol after the sign ("-$12.05")
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{}{}{}.{:02}", sign, symbol, abs / 100, abs % 100)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol("$"))
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}
