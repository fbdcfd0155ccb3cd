//! Monetary amounts.

use serde::{Deserialize, Serialize};

use dealroom_core::{DomainError, ValueObject};

/// Nonnegative amount in the smallest currency unit (cents).
///
/// Never floating point. Formatting is a display concern only; arithmetic is
/// checked so overflow surfaces as `None` instead of wrapping.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(amount: u64) -> Self {
        Self(amount)
    }

    /// Whole currency units, e.g. `Money::from_major(250_000)` is $250,000.00.
    pub fn from_major(units: u64) -> Option<Self> {
        units.checked_mul(100).map(Self)
    }

    pub const fn minor(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Sum that clamps at `u64::MAX` instead of overflowing.
    pub fn saturating_sum<I>(amounts: I) -> Money
    where
        I: IntoIterator<Item = Money>,
    {
        Money(
            amounts
                .into_iter()
                .fold(0u64, |acc, m| acc.saturating_add(m.0)),
        )
    }
}

impl TryFrom<i64> for Money {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u64::try_from(value)
            .map(Money)
            .map_err(|_| DomainError::validation(format!("amount must be nonnegative, got {value}")))
    }
}

impl From<u64> for Money {
    fn from(value: u64) -> Self {
        Money(value)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let major = (self.0 / 100).to_string();
        let cents = self.0 % 100;

        let mut grouped = String::with_capacity(major.len() + major.len() / 3);
        for (i, ch) in major.chars().enumerate() {
            if i > 0 && (major.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        write!(f, "${grouped}.{cents:02}")
    }
}
