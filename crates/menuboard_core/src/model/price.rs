//! Menu price value type.
//!
//! # Invariants
//! - Prices are whole, non-negative currency units (no subunits).
//! - Form text is parsed strictly; anything that is not a whole number is
//!   rejected rather than coerced.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Currency code appended to formatted prices.
pub const CURRENCY_CODE: &str = "IQD";

/// Whole-unit menu price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPrice", into = "u64")]
pub struct Price(u64);

impl Price {
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    pub const fn amount(self) -> u64 {
        self.0
    }

    /// Formats the amount with `,` thousands grouping and the currency code.
    ///
    /// `6000` renders as `6,000 IQD`.
    pub fn display(self) -> String {
        let digits = self.0.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (index, ch) in digits.chars().enumerate() {
            if index > 0 && (digits.len() - index) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        format!("{grouped} {CURRENCY_CODE}")
    }
}

impl From<u64> for Price {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Price> for u64 {
    fn from(value: Price) -> Self {
        value.0
    }
}

/// Price parse failures for raw form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    Empty,
    Negative,
    Fractional,
    NotNumeric(String),
    Overflow,
}

impl Display for PriceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "price is required"),
            Self::Negative => write!(f, "price must not be negative"),
            Self::Fractional => write!(f, "price must be a whole amount"),
            Self::NotNumeric(value) => write!(f, "price `{value}` is not a number"),
            Self::Overflow => write!(f, "price is too large"),
        }
    }
}

impl Error for PriceError {}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }
        if trimmed.starts_with('-') {
            return Err(PriceError::Negative);
        }

        // Number inputs may submit `6000.00`; only a zero fraction is whole.
        let whole = match trimmed.split_once('.') {
            Some((whole, fraction)) => {
                if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(PriceError::NotNumeric(trimmed.to_string()));
                }
                if fraction.bytes().any(|b| b != b'0') {
                    return Err(PriceError::Fractional);
                }
                whole
            }
            None => trimmed,
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PriceError::NotNumeric(trimmed.to_string()));
        }

        whole.parse::<u64>().map(Self).map_err(|_| PriceError::Overflow)
    }
}

/// Wire shape accepted for prices: numbers, or numeric text written by older
/// snapshots that stored raw form values.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(u64),
    /// Older writers emitted `6000.0`; same whole-amount rule as text.
    Float(f64),
    Text(String),
}

impl TryFrom<RawPrice> for Price {
    type Error = PriceError;

    fn try_from(value: RawPrice) -> Result<Self, Self::Error> {
        match value {
            RawPrice::Number(amount) => Ok(Self(amount)),
            RawPrice::Float(amount) => {
                if amount < 0.0 {
                    Err(PriceError::Negative)
                } else if amount.fract() != 0.0 {
                    Err(PriceError::Fractional)
                } else if amount >= u64::MAX as f64 {
                    Err(PriceError::Overflow)
                } else {
                    Ok(Self(amount as u64))
                }
            }
            RawPrice::Text(text) => text.parse(),
        }
    }
}
