//! Checkout
//!
//! Turning a cart into a receipt happens in two steps: [`Checkout::prepare`]
//! validates the cart and payment and snapshots the order, and
//! [`PendingOrder::confirm`] issues the receipt and empties the cart.
//! Dropping a pending order cancels it.

use std::fmt;

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::info;

use crate::{
    cart::Cart,
    pricing::{PricingError, format_amount},
    receipt::{Receipt, ReceiptLine},
};

/// Reasons a checkout cannot proceed.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// Nothing to buy.
    #[error("The cart is empty, add products before checking out")]
    EmptyCart,

    /// Card payment selected without a card number.
    #[error("Please enter a card number")]
    MissingCardNumber,

    /// Amounts could not be calculated.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// How the customer wants to pay, before any card details are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum PaymentKind {
    /// Pay in cash.
    #[default]
    Cash,

    /// Pay by card.
    Card,
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentKind::Cash => write!(f, "cash"),
            PaymentKind::Card => write!(f, "card"),
        }
    }
}

/// A non-empty card number.
#[derive(Clone, PartialEq, Eq)]
pub struct CardNumber(String);

impl CardNumber {
    /// Create a card number from user input.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingCardNumber`] if the input is blank.
    pub fn new(input: &str) -> Result<Self, CheckoutError> {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Err(CheckoutError::MissingCardNumber);
        }

        Ok(Self(trimmed.to_string()))
    }

    /// The number with everything but the last four characters hidden.
    pub fn masked(&self) -> String {
        let visible: String = {
            let mut tail: Vec<char> = self
                .0
                .chars()
                .rev()
                .filter(|c| !c.is_whitespace() && *c != '-')
                .take(4)
                .collect();

            tail.reverse();
            tail.into_iter().collect()
        };

        format!("**** {visible}")
    }
}

// Keep card numbers out of logs and debug output.
impl fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CardNumber").field(&self.masked()).finish()
    }
}

/// A validated payment method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payment {
    /// Cash
    Cash,

    /// Card
    Card(CardNumber),
}

impl Payment {
    /// Build a payment from the selected kind and the card number field.
    ///
    /// The card number is ignored for cash payments.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingCardNumber`] for a card payment with a blank number.
    pub fn select(kind: PaymentKind, card_number: &str) -> Result<Self, CheckoutError> {
        match kind {
            PaymentKind::Cash => Ok(Payment::Cash),
            PaymentKind::Card => CardNumber::new(card_number).map(Payment::Card),
        }
    }

    /// The kind of this payment.
    pub fn kind(&self) -> PaymentKind {
        match self {
            Payment::Cash => PaymentKind::Cash,
            Payment::Card(_) => PaymentKind::Card,
        }
    }
}

impl fmt::Display for Payment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payment::Cash => write!(f, "cash"),
            Payment::Card(number) => write!(f, "card {}", number.masked()),
        }
    }
}

/// Entry point for checkouts.
#[derive(Debug)]
pub struct Checkout;

impl Checkout {
    /// Validate the cart and snapshot it into an order awaiting confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if there is nothing to buy, or a
    /// pricing error if the amounts overflow.
    pub fn prepare<'a>(cart: &Cart<'a>, payment: Payment) -> Result<PendingOrder<'a>, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let lines = cart
            .lines()
            .map(|line| {
                line.map(|line| ReceiptLine {
                    name: line.product.name.clone(),
                    quantity: line.quantity,
                    unit_price: line.product.price,
                    amount: line.amount,
                    image: line.product.image.clone(),
                })
            })
            .collect::<Result<SmallVec<[ReceiptLine<'a>; 8]>, _>>()?;

        Ok(PendingOrder {
            lines,
            total: cart.total()?,
            payment,
            currency: cart.currency(),
        })
    }
}

/// A validated order waiting for the customer to confirm.
#[derive(Debug, Clone)]
pub struct PendingOrder<'a> {
    lines: SmallVec<[ReceiptLine<'a>; 8]>,
    total: Money<'a, Currency>,
    payment: Payment,
    currency: &'static Currency,
}

impl<'a> PendingOrder<'a> {
    /// Amount to be paid.
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Selected payment.
    pub fn payment(&self) -> &Payment {
        &self.payment
    }

    /// Question to put to the customer before confirming.
    pub fn confirmation_prompt(&self) -> String {
        format!(
            "Confirm order of {} paid by {}?",
            format_amount(&self.total),
            self.payment
        )
    }

    /// Issue the receipt and empty the cart.
    pub fn confirm(self, cart: &mut Cart<'a>) -> Receipt<'a> {
        info!(
            lines = self.lines.len(),
            total = %format_amount(&self.total),
            payment = %self.payment.kind(),
            "order confirmed"
        );

        cart.clear();

        Receipt::new(self.lines, self.total, self.payment, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::RUB;
    use testresult::TestResult;

    use crate::{
        catalog::{Catalog, CatalogError, Category},
        products::{Product, ProductKey},
        quantity::Quantity,
    };

    use super::*;

    fn test_catalog() -> Result<(Catalog<'static>, ProductKey, ProductKey), CatalogError> {
        let mut catalog = Catalog::new(RUB);

        catalog
            .add_category(Category::new("fruit", "Fruit"))?
            .add_category(Category::new("other", "Other"))?;

        let apples = catalog.insert(
            "apples",
            Product::new("Apples 1kg", "fruit", Money::from_minor(9000, RUB))
                .with_image("images/apples.png"),
        )?;
        let bread = catalog.insert(
            "bread",
            Product::new("Bread loaf", "other", Money::from_minor(5000, RUB)),
        )?;

        Ok((catalog, apples, bread))
    }

    #[test]
    fn empty_cart_cannot_check_out() -> TestResult {
        let (catalog, _, _) = test_catalog()?;
        let cart = Cart::new(&catalog);

        let result = Checkout::prepare(&cart, Payment::Cash);

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));

        Ok(())
    }

    #[test]
    fn card_payment_requires_number() {
        assert_eq!(
            Payment::select(PaymentKind::Card, "   "),
            Err(CheckoutError::MissingCardNumber)
        );
    }

    #[test]
    fn cash_payment_ignores_card_field() -> TestResult {
        assert_eq!(Payment::select(PaymentKind::Cash, "")?, Payment::Cash);

        Ok(())
    }

    #[test]
    fn card_number_is_masked() -> TestResult {
        let number = CardNumber::new("4111 1111 1111 1234")?;

        assert_eq!(number.masked(), "**** 1234");
        assert_eq!(format!("{number:?}"), "CardNumber(\"**** 1234\")");
        assert_eq!(Payment::Card(number).to_string(), "card **** 1234");

        Ok(())
    }

    #[test]
    fn prepare_snapshots_total_and_prompt() -> TestResult {
        let (catalog, apples, bread) = test_catalog()?;
        let mut cart = Cart::new(&catalog);

        cart.add(apples, Quantity::new(2)?)?;
        cart.add(bread, Quantity::ONE)?;

        let order = Checkout::prepare(&cart, Payment::Cash)?;

        assert_eq!(order.total(), Money::from_minor(23000, RUB));
        assert_eq!(order.payment(), &Payment::Cash);
        assert_eq!(
            order.confirmation_prompt(),
            "Confirm order of 230.00 RUB paid by cash?"
        );
        assert_eq!(cart.len(), 2);

        Ok(())
    }

    #[test]
    fn confirm_issues_receipt_and_clears_cart() -> TestResult {
        let (catalog, apples, bread) = test_catalog()?;
        let mut cart = Cart::new(&catalog);

        cart.add(bread, Quantity::ONE)?;
        cart.add(apples, Quantity::new(2)?)?;

        let order = Checkout::prepare(&cart, Payment::select(PaymentKind::Card, "1234")?)?;
        let receipt = order.confirm(&mut cart);

        assert!(cart.is_empty());
        assert_eq!(cart.total()?, Money::from_minor(0, RUB));
        assert_eq!(receipt.total(), Money::from_minor(23000, RUB));

        let names: Vec<&str> = receipt.lines().iter().map(|l| l.name.as_str()).collect();

        assert_eq!(names, ["Bread loaf", "Apples 1kg"]);
        assert_eq!(receipt.cover_image(), None);

        Ok(())
    }

    #[test]
    fn dropping_pending_order_keeps_cart() -> TestResult {
        let (catalog, apples, _) = test_catalog()?;
        let mut cart = Cart::new(&catalog);

        cart.add(apples, Quantity::new(3)?)?;

        let order = Checkout::prepare(&cart, Payment::Cash)?;
        drop(order);

        assert_eq!(cart.quantity(apples), Some(Quantity::new(3)?));

        Ok(())
    }
}
