//! Fare prices.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid price string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid price: {reason}")]
pub struct PriceError {
    reason: &'static str,
}

impl PriceError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A non-negative amount of sterling, held exactly in pence.
///
/// Whole pence make equality and hashing exact, which the overnight
/// de-duplication relies on.
///
/// # Examples
///
/// ```
/// use fare_finder::domain::Price;
///
/// let price = Price::parse("30.50").unwrap();
/// assert_eq!(price.pence(), 3050);
/// assert_eq!(price.to_string(), "£30.50");
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(u32);

impl Price {
    /// Create a price from a number of pence.
    pub const fn from_pence(pence: u32) -> Self {
        Self(pence)
    }

    /// Create a price from whole pounds.
    pub const fn from_pounds(pounds: u32) -> Self {
        Self(pounds * 100)
    }

    /// Parse `"30.50"`, `"£30.50"` or `"30"`.
    ///
    /// At most two decimal places are accepted.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let s = s.trim();
        let s = s.strip_prefix('£').unwrap_or(s);

        let (pounds, pence) = match s.split_once('.') {
            Some((pounds, pence)) => (pounds, pence),
            None => (s, ""),
        };

        if pounds.is_empty() || !pounds.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PriceError::new("expected digits before the decimal point"));
        }
        if pence.len() > 2 || !pence.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PriceError::new("expected at most two pence digits"));
        }

        let pounds: u32 = pounds
            .parse()
            .map_err(|_| PriceError::new("pounds out of range"))?;
        let pence: u32 = match pence.len() {
            0 => 0,
            1 => pence.parse::<u32>().unwrap_or(0) * 10,
            _ => pence.parse().unwrap_or(0),
        };

        pounds
            .checked_mul(100)
            .and_then(|p| p.checked_add(pence))
            .map(Self)
            .ok_or_else(|| PriceError::new("pounds out of range"))
    }

    /// Returns the amount in pence.
    pub fn pence(&self) -> u32 {
        self.0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "£{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
