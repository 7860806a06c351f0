//! Fixed-point currency amounts.
//!
//! Amounts are entered as decimal text and parsed as floating point, but are
//! stored and summed as whole minor units so that totals never drift.

use crate::errors::EntryError;
use std::fmt;

/// Number of minor units in one major unit.
const PRECISION: f64 = 100.0;

/// Largest amount accepted from text, in minor units (ten trillion major
/// units). Keeps realistic reports far from the `i64` limit.
pub const MAX_CENTS: i64 = 1_000_000_000_000_000;

/// A currency amount expressed in minor units (cents).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Parses user supplied amount text.
    ///
    /// The text is read as a floating point number and rounded to the nearest
    /// minor unit. Empty, non-numeric, non-finite and negative values are
    /// rejected, as is anything above [`MAX_CENTS`].
    pub fn parse(text: &str) -> Result<Self, EntryError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(EntryError::AmountRequired);
        }

        let value: f64 = trimmed
            .parse()
            .map_err(|_| EntryError::InvalidAmount(trimmed.to_string()))?;
        if !value.is_finite() {
            return Err(EntryError::InvalidAmount(trimmed.to_string()));
        }
        if value < 0.0 {
            return Err(EntryError::NegativeAmount(trimmed.to_string()));
        }

        let cents = (value * PRECISION).round();
        if cents > MAX_CENTS as f64 {
            return Err(EntryError::AmountOutOfRange(trimmed.to_string()));
        }

        Ok(Self(cents as i64))
    }

    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// Sums `amounts`, or returns `None` if the total does not fit.
    pub fn checked_sum<I>(amounts: I) -> Option<Amount>
    where
        I: IntoIterator<Item = Amount>,
    {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, Amount::checked_add)
    }

    /// Renders the amount without grouping separators, e.g. `1234.50`. This
    /// is the form written to the record store.
    pub fn to_plain_string(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();
        format!("{}{}.{:02}", sign, cents / 100, cents % 100)
    }
}

/// Formats with thousands separators and exactly two decimals, e.g.
/// `1,234,567.89`.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = self.0.unsigned_abs();
        let digits = (cents / 100).to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, digit) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        if self.0 < 0 {
            write!(f, "-")?;
        }
        write!(f, "{}.{:02}", grouped, cents % 100)
    }
}
