//! Pricing

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::quantity::Quantity;

/// Errors that can occur while calculating amounts.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The amount does not fit in minor units.
    #[error("amount overflowed while pricing {0}")]
    Overflow(String),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculates the amount for `quantity` units at `unit_price`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the amount does not fit in minor units.
pub fn line_amount<'a>(
    unit_price: &Money<'a, Currency>,
    quantity: Quantity,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor_units = unit_price
        .to_minor_units()
        .checked_mul(i64::from(quantity.get()))
        .ok_or_else(|| PricingError::Overflow(format!("{quantity} x {unit_price}")))?;

    Ok(Money::from_minor(minor_units, unit_price.currency()))
}

/// Sums a list of amounts, starting from zero in `currency`.
///
/// # Errors
///
/// - [`PricingError::Money`]: an amount is in a different currency.
/// - [`PricingError::Overflow`]: the sum does not fit in minor units.
pub fn total_amount<'a>(
    amounts: impl IntoIterator<Item = Money<'a, Currency>>,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, PricingError> {
    amounts
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, amount| {
            if amount.currency() != currency {
                return Err(PricingError::Money(MoneyError::CurrencyMismatch {
                    expected: currency.iso_alpha_code,
                    actual: amount.currency().iso_alpha_code,
                }));
            }

            acc.to_minor_units()
                .checked_add(amount.to_minor_units())
                .map(|sum| Money::from_minor(sum, currency))
                .ok_or_else(|| PricingError::Overflow(format!("{acc} + {amount}")))
        })
}

/// Formats an amount as `major.minor CODE`, e.g. `230.00 RUB`.
pub fn format_amount(amount: &Money<'_, Currency>) -> String {
    let minor_units = amount.to_minor_units();
    let abs_minor = minor_units.unsigned_abs();
    let sign = if minor_units < 0 { "-" } else { "" };

    format!(
        "{sign}{}.{:02} {}",
        abs_minor / 100,
        abs_minor % 100,
        amount.currency().iso_alpha_code
    )
}
