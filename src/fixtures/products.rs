//! Product Fixtures

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, RUB, USD},
};
use serde::Deserialize;

use crate::{fixtures::FixtureError, products::Product};

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Stable product key (e.g., "apples")
    pub key: String,

    /// Product name
    pub name: String,

    /// Category key
    pub category: String,

    /// Product price (e.g., "90.00 RUB")
    pub price: String,

    /// Optional image reference
    #[serde(default)]
    pub image: Option<String>,
}

impl ProductFixture {
    /// Split the fixture into its key and the parsed product.
    ///
    /// # Errors
    ///
    /// Returns an error if the price cannot be parsed.
    pub fn into_keyed_product(self) -> Result<(String, Product<'static>), FixtureError> {
        let (minor_units, currency) = parse_price(&self.price)?;

        let product = Product {
            name: self.name,
            category: self.category,
            price: Money::from_minor(minor_units, currency),
            image: self.image.filter(|image| !image.trim().is_empty()),
        };

        Ok((self.key, product))
    }
}

/// Parse price string (e.g., "2.99 GBP") into minor units and currency
///
/// Amounts are rounded half away from zero to two decimal places.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(FixtureError::InvalidPrice(format!(
            "Price cannot be negative, got: {s}"
        )));
    }

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| {
            value
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        "RUB" => RUB,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("2.99GBP");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_rejects_negative_amounts() {
        let result = parse_price("-1.00 RUB");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_accepts_supported_currencies() -> Result<(), FixtureError> {
        let (usd_minor, usd) = parse_price("1.00 USD")?;
        let (eur_minor, eur) = parse_price("2.50 EUR")?;
        let (rub_minor, rub) = parse_price("90 RUB")?;

        assert_eq!(usd_minor, 100);
        assert_eq!(usd, USD);
        assert_eq!(eur_minor, 250);
        assert_eq!(eur, EUR);
        assert_eq!(rub_minor, 9000);
        assert_eq!(rub, RUB);

        Ok(())
    }

    #[test]
    fn parse_price_rounds_half_away_from_zero() -> Result<(), FixtureError> {
        let (up, _) = parse_price("0.125 GBP")?;
        let (also_up, _) = parse_price("0.135 GBP")?;
        let (down, _) = parse_price("0.124 GBP")?;

        assert_eq!(up, 13);
        assert_eq!(also_up, 14);
        assert_eq!(down, 12);

        Ok(())
    }

    #[test]
    fn product_fixture_converts_to_keyed_product() -> TestResult {
        let fixture = ProductFixture {
            key: "apples".to_string(),
            name: "Apples 1kg".to_string(),
            category: "fruit".to_string(),
            price: "90.00 RUB".to_string(),
            image: Some("  ".to_string()),
        };

        let (key, product) = fixture.into_keyed_product()?;

        assert_eq!(key, "apples");
        assert_eq!(product.price, Money::from_minor(9000, RUB));
        assert!(product.image.is_none());

        Ok(())
    }
}
