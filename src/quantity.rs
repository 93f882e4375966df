//! Quantities

use std::{fmt, num::NonZeroU32, str::FromStr};

use thiserror::Error;

/// Errors produced when constructing a [`Quantity`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantityError {
    /// Quantities must be at least one.
    #[error("Quantity must be at least 1")]
    Zero,

    /// The value was negative.
    #[error("Quantity must be at least 1, got {0}")]
    Negative(i64),

    /// The value does not fit in a quantity.
    #[error("Quantity {0} is too large")]
    TooLarge(i64),

    /// The input was not a whole number.
    #[error("Invalid quantity: {0}")]
    Invalid(String),
}

/// A strictly positive number of units of one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Zero`] if `units` is zero.
    pub fn new(units: u32) -> Result<Self, QuantityError> {
        NonZeroU32::new(units).map(Self).ok_or(QuantityError::Zero)
    }

    /// Number of units.
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Add two quantities, returning `None` on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.get()).map(Self)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < 0 {
            return Err(QuantityError::Negative(value));
        }

        let units = u32::try_from(value).map_err(|_err| QuantityError::TooLarge(value))?;

        Self::new(units)
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_err| QuantityError::Invalid(s.trim().to_string()))?;

        Self::try_from(value)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn zero_is_rejected() {
        assert_eq!(Quantity::new(0), Err(QuantityError::Zero));
    }

    #[test]
    fn negative_is_rejected() {
        assert_eq!(Quantity::try_from(-3), Err(QuantityError::Negative(-3)));
        assert_eq!("-1".parse::<Quantity>(), Err(QuantityError::Negative(-1)));
    }

    #[test]
    fn oversized_is_rejected() {
        let too_big = i64::from(u32::MAX) + 1;

        assert_eq!(Quantity::try_from(too_big), Err(QuantityError::TooLarge(too_big)));
    }

    #[test]
    fn parses_trimmed_input() -> TestResult {
        let quantity: Quantity = " 7 ".parse()?;

        assert_eq!(quantity.get(), 7);

        Ok(())
    }

    #[test]
    fn non_numeric_input_is_invalid() {
        assert!(matches!(
            "two".parse::<Quantity>(),
            Err(QuantityError::Invalid(input)) if input == "two"
        ));
    }

    #[test]
    fn checked_add_sums_and_detects_overflow() -> TestResult {
        let two = Quantity::new(2)?;
        let three = Quantity::new(3)?;

        assert_eq!(two.checked_add(three), Some(Quantity::new(5)?));
        assert_eq!(Quantity::new(u32::MAX)?.checked_add(Quantity::ONE), None);

        Ok(())
    }
}
