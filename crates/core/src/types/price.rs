//! Type-safe price representation using decimal arithmetic.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A non-negative monetary amount in the store currency's standard unit
/// (dollars, not cents).
///
/// Construction through [`Price::parse`] rejects negative amounts, so a
/// `Price` held by a domain type is always `>= 0`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

/// Error parsing a price from user input.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("not a valid decimal number")]
    Invalid,
    /// The input is a decimal number below zero.
    #[error("price must not be negative")]
    Negative,
}

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a decimal amount.
    ///
    /// Callers are expected to pass non-negative amounts; database CHECK
    /// constraints back this up for persisted rows.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Parse a price from a form field, rejecting negative amounts.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Invalid`] if the input is not a decimal number
    /// and [`PriceError::Negative`] if it is below zero.
    pub fn parse(input: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(input.trim()).map_err(|_| PriceError::Invalid)?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    /// Format for display with two decimal places, e.g. `$19.99`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn parse_accepts_plain_decimals() {
        assert_eq!(Price::parse("10"), Ok(Price::new(dec("10"))));
        assert_eq!(Price::parse(" 19.99 "), Ok(Price::new(dec("19.99"))));
        assert_eq!(Price::parse("0"), Ok(Price::ZERO));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(Price::parse("ten dollars"), Err(PriceError::Invalid));
        assert_eq!(Price::parse(""), Err(PriceError::Invalid));
        assert_eq!(Price::parse("$5"), Err(PriceError::Invalid));
    }

    #[test]
    fn parse_rejects_negative_amounts() {
        assert_eq!(Price::parse("-0.01"), Err(PriceError::Negative));
        assert_eq!(Price::parse("-100"), Err(PriceError::Negative));
    }

    #[test]
    fn display_pads_to_two_decimal_places() {
        assert_eq!(Price::new(dec("10")).to_string(), "$10.00");
        assert_eq!(Price::new(dec("19.9")).to_string(), "$19.90");
        assert_eq!(Price::new(dec("0.5")).to_string(), "$0.50");
    }

    #[test]
    fn prices_order_by_amount() {
        assert!(Price::parse("5").unwrap() < Price::parse("20").unwrap());
        assert!(Price::parse("5.01").unwrap() > Price::parse("5").unwrap());
    }
}
