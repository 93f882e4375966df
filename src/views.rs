//! Views
//!
//! Tabular rendering of the catalog and the cart.

use std::{fmt::Write as _, io, ops::Range};

use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    catalog::{Catalog, Category},
    pricing::{PricingError, format_amount},
};

/// Errors raised while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing to the output failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Amounts could not be calculated.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The requested category does not exist.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

/// Writes the catalog grouped by category, or a single category.
///
/// # Errors
///
/// Returns a [`RenderError`] if the category is unknown or the output cannot be written.
pub fn write_catalog(
    mut out: impl io::Write,
    catalog: &Catalog<'_>,
    category: Option<&str>,
) -> Result<(), RenderError> {
    match category {
        Some(query) => {
            let category = catalog
                .category(query)
                .ok_or_else(|| RenderError::UnknownCategory(query.to_string()))?;

            write_category(&mut out, catalog, category)
        }
        None => catalog
            .categories()
            .iter()
            .try_for_each(|category| write_category(&mut out, catalog, category)),
    }
}

fn write_category(
    out: &mut impl io::Write,
    catalog: &Catalog<'_>,
    category: &Category,
) -> Result<(), RenderError> {
    writeln!(out, "\n\x1b[1m{}\x1b[0m", category.name)?;

    let mut builder = Builder::default();

    builder.push_record(["Key", "Item", "Price"]);

    let mut rows = 0usize;

    for (key, product) in catalog.in_category(&category.key) {
        builder.push_record([
            catalog.key_str(key).unwrap_or_default().to_string(),
            product.name.clone(),
            format_amount(&product.price),
        ]);

        rows += 1;
    }

    if rows == 0 {
        writeln!(out, "  (no products)")?;

        return Ok(());
    }

    writeln!(out, "{}", render_table(builder, 2..3))?;

    Ok(())
}

/// Writes the categories in display order.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_categories(mut out: impl io::Write, catalog: &Catalog<'_>) -> Result<(), RenderError> {
    for category in catalog.categories() {
        let count = catalog.in_category(&category.key).count();

        writeln!(out, "  {:<12} {} ({count})", category.key, category.name)?;
    }

    Ok(())
}

/// Writes the cart contents and total.
///
/// # Errors
///
/// Returns a [`RenderError`] if amounts overflow or the output cannot be written.
pub fn write_cart(mut out: impl io::Write, cart: &Cart<'_>) -> Result<(), RenderError> {
    if cart.is_empty() {
        writeln!(out, "Your cart is empty.")?;
    } else {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Price", "Qty", "Amount"]);

        for (idx, line) in cart.lines().enumerate() {
            let line = line?;

            builder.push_record([
                format!("#{:<3}", idx + 1),
                line.product.name.clone(),
                format_amount(&line.product.price),
                line.quantity.to_string(),
                format_amount(&line.amount),
            ]);
        }

        writeln!(out, "{}", render_table(builder, 2..5))?;
    }

    writeln!(out, " \x1b[1mTotal:\x1b[0m {}", format_amount(&cart.total()?))?;

    Ok(())
}

/// Builds a table with a bold header and right-aligned numeric columns.
pub(crate) fn render_table(builder: Builder, numeric_columns: Range<usize>) -> String {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(numeric_columns), Alignment::right());

    colorize_borders(&table.to_string())
}

/// Wraps runs of UTF-8 box-drawing characters in ANSI dark-grey escape codes.
///
/// Box-drawing characters occupy the Unicode range U+2500..U+257F.
pub(crate) fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Returns the visible (non-ANSI) width of a string.
pub(crate) fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

/// Removes ANSI escape sequences.
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            out.push(ch);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::RUB};
    use testresult::TestResult;

    use crate::{fixtures::builtin_catalog, products::Product, quantity::Quantity};

    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<(), RenderError>) -> Result<String, RenderError> {
        let mut out = Vec::new();

        f(&mut out)?;

        Ok(strip_ansi(&String::from_utf8_lossy(&out)))
    }

    #[test]
    fn catalog_lists_every_category_in_order() -> TestResult {
        let catalog = builtin_catalog()?;
        let output = render(|out| write_catalog(out, &catalog, None))?;

        let fruit = output.find("Fruit").ok_or("Fruit missing")?;
        let funny = output.find("Funny").ok_or("Funny missing")?;

        assert!(fruit < funny, "categories out of order:\n{output}");
        assert!(output.contains("Spider-Man mask"), "{output}");
        assert!(output.contains("150.00 RUB"), "{output}");

        Ok(())
    }

    #[test]
    fn single_category_only_lists_its_products() -> TestResult {
        let catalog = builtin_catalog()?;
        let output = render(|out| write_catalog(out, &catalog, Some("vegetables")))?;

        assert!(output.contains("Tomatoes 1kg"), "{output}");
        assert!(output.contains("Cucumbers 1kg"), "{output}");
        assert!(!output.contains("Apples 1kg"), "{output}");

        Ok(())
    }

    #[test]
    fn unknown_category_is_an_error() -> TestResult {
        let catalog = builtin_catalog()?;
        let result = render(|out| write_catalog(out, &catalog, Some("toys")));

        assert!(matches!(result, Err(RenderError::UnknownCategory(name)) if name == "toys"));

        Ok(())
    }

    #[test]
    fn empty_category_is_reported() -> TestResult {
        let mut catalog = Catalog::new(RUB);

        catalog
            .add_category(Category::new("fruit", "Fruit"))?
            .add_category(Category::new("toys", "Toys"))?;
        catalog.insert(
            "apples",
            Product::new("Apples 1kg", "fruit", Money::from_minor(9000, RUB)),
        )?;

        let output = render(|out| write_catalog(out, &catalog, Some("toys")))?;

        assert!(output.contains("(no products)"), "{output}");

        Ok(())
    }

    #[test]
    fn cart_shows_lines_and_total() -> TestResult {
        let catalog = builtin_catalog()?;
        let apples = catalog.key("apples").ok_or("apples missing")?;
        let bread = catalog.key("bread").ok_or("bread missing")?;
        let mut cart = Cart::new(&catalog);

        cart.add(apples, Quantity::new(2)?)?;
        cart.add(bread, Quantity::ONE)?;

        let output = render(|out| write_cart(out, &cart))?;

        assert!(output.contains("Apples 1kg"), "{output}");
        assert!(output.contains("180.00 RUB"), "{output}");
        assert!(output.contains("Total: 230.00 RUB"), "{output}");

        Ok(())
    }

    #[test]
    fn empty_cart_shows_zero_total() -> TestResult {
        let catalog = builtin_catalog()?;
        let cart = Cart::new(&catalog);

        let output = render(|out| write_cart(out, &cart))?;

        assert!(output.contains("Your cart is empty."), "{output}");
        assert!(output.contains("Total: 0.00 RUB"), "{output}");

        Ok(())
    }

    #[test]
    fn categories_show_product_counts() -> TestResult {
        let catalog = builtin_catalog()?;
        let output = render(|out| write_categories(out, &catalog))?;

        assert!(output.contains("Masks (2)"), "{output}");
        assert!(output.contains("Funny (1)"), "{output}");

        Ok(())
    }

    #[test]
    fn visible_width_ignores_escape_codes() {
        assert_eq!(visible_width("\x1b[1mTotal:\x1b[0m"), 6);
        assert_eq!(strip_ansi("\x1b[90m│\x1b[0m a"), "│ a");
    }

    #[test]
    fn colorize_borders_wraps_box_runs() {
        assert_eq!(colorize_borders("─┼ x"), "\x1b[90m─┼\x1b[0m x");
    }
}
