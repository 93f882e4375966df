//! Receipt

use std::io;

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tabled::builder::Builder;
use thiserror::Error;

use crate::{
    checkout::Payment,
    pricing::format_amount,
    quantity::Quantity,
    views::{render_table, visible_width},
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// One purchased product on a receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine<'a> {
    /// Product name at the time of purchase
    pub name: String,

    /// Units bought
    pub quantity: Quantity,

    /// Price per unit
    pub unit_price: Money<'a, Currency>,

    /// Unit price times quantity
    pub amount: Money<'a, Currency>,

    /// Product image reference
    pub image: Option<String>,
}

/// Final receipt for a confirmed order.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    /// Purchased lines, in the order products were added to the cart
    lines: SmallVec<[ReceiptLine<'a>; 8]>,

    /// Total amount paid
    total: Money<'a, Currency>,

    /// How the order was paid
    payment: Payment,

    /// Currency used for all monetary values
    currency: &'static Currency,
}

impl<'a> Receipt<'a> {
    /// Create a new receipt with the given details.
    #[must_use]
    pub fn new(
        lines: SmallVec<[ReceiptLine<'a>; 8]>,
        total: Money<'a, Currency>,
        payment: Payment,
        currency: &'static Currency,
    ) -> Self {
        Self {
            lines,
            total,
            payment,
            currency,
        }
    }

    /// Purchased lines
    pub fn lines(&self) -> &[ReceiptLine<'a>] {
        &self.lines
    }

    /// Total amount paid
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Payment used
    pub fn payment(&self) -> &Payment {
        &self.payment
    }

    /// Currency used for all monetary values.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Total number of units bought.
    pub fn units(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity.get()))
            .sum()
    }

    /// Image shown at the top of the receipt: the first purchased product's.
    pub fn cover_image(&self) -> Option<&str> {
        self.lines.first().and_then(|line| line.image.as_deref())
    }

    /// Writes the receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        writeln!(out, "\n \x1b[1mThank you for your purchase!\x1b[0m")?;

        if let Some(image) = self.cover_image() {
            writeln!(out, " [{image}]")?;
        }

        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Qty", "Price", "Amount"]);

        for (idx, line) in self.lines.iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                line.name.clone(),
                line.quantity.to_string(),
                format_amount(&line.unit_price),
                format_amount(&line.amount),
            ]);
        }

        writeln!(out, "\n{}", render_table(builder, 2..5))?;

        let total_label = " \x1b[1mTotal:\x1b[0m";
        let paid_label = " Paid by:";

        let total_val = format!("\x1b[1m{}\x1b[0m", format_amount(&self.total));
        let paid_val = self.payment.to_string();

        let label_width = visible_width(total_label).max(visible_width(paid_label));
        let value_width = visible_width(&total_val).max(visible_width(&paid_val));

        write_summary_line(&mut out, total_label, &total_val, label_width, value_width)?;
        write_summary_line(&mut out, paid_label, &paid_val, label_width, value_width)?;

        writeln!(out)?;

        Ok(())
    }
}

/// Writes a summary line with a right-aligned label and a right-aligned value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {}{value}",
        "",
        " ".repeat(value_pad)
    )?;

    Ok(())
}
