//! Cart

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::Catalog,
    pricing::{PricingError, line_amount, total_amount},
    products::{Product, ProductKey},
    quantity::Quantity,
};

/// Errors related to cart updates.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The product is not part of the cart's catalog.
    #[error("Product not found in catalog")]
    UnknownProduct(ProductKey),

    /// The accumulated quantity no longer fits.
    #[error("Quantity of {0} in the cart would overflow")]
    QuantityOverflow(String),
}

/// A product and how many units of it are in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartEntry {
    product: ProductKey,
    quantity: Quantity,
}

impl CartEntry {
    /// Product key
    pub fn product(&self) -> ProductKey {
        self.product
    }

    /// Units of the product
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }
}

/// A cart entry resolved against the catalog.
#[derive(Debug, Clone)]
pub struct CartLine<'c, 'a> {
    /// Product key
    pub key: ProductKey,

    /// Catalog product
    pub product: &'c Product<'a>,

    /// Units in the cart
    pub quantity: Quantity,

    /// Unit price times quantity
    pub amount: Money<'a, Currency>,
}

/// Cart
///
/// Entries are unique per product and kept in the order they were first added.
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    catalog: &'a Catalog<'a>,
    entries: SmallVec<[CartEntry; 8]>,
}

impl<'a> Cart<'a> {
    /// Create an empty cart over the given catalog.
    #[must_use]
    pub fn new(catalog: &'a Catalog<'a>) -> Self {
        Self {
            catalog,
            entries: SmallVec::new(),
        }
    }

    /// Add `quantity` units of a product, returning the quantity now in the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the product is not in the catalog or the
    /// accumulated quantity would overflow.
    pub fn add(&mut self, product: ProductKey, quantity: Quantity) -> Result<Quantity, CartError> {
        let details = self
            .catalog
            .get(product)
            .ok_or(CartError::UnknownProduct(product))?;

        let stored = if let Some(entry) = self.entries.iter_mut().find(|e| e.product == product) {
            entry.quantity = entry
                .quantity
                .checked_add(quantity)
                .ok_or_else(|| CartError::QuantityOverflow(details.name.clone()))?;

            entry.quantity
        } else {
            self.entries.push(CartEntry { product, quantity });

            quantity
        };

        debug!(product = %details.name, %quantity, %stored, "added to cart");

        Ok(stored)
    }

    /// Remove a product from the cart, returning the quantity it had.
    ///
    /// Removing a product that is not in the cart does nothing.
    pub fn remove(&mut self, product: ProductKey) -> Option<Quantity> {
        let position = self.entries.iter().position(|e| e.product == product)?;
        let entry = self.entries.remove(position);

        debug!(quantity = %entry.quantity, "removed from cart");

        Some(entry.quantity)
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        debug!(entries = self.entries.len(), "cart cleared");

        self.entries.clear();
    }

    /// Total price of the cart. Zero in the catalog currency when empty.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the amount overflows.
    pub fn total(&self) -> Result<Money<'a, Currency>, PricingError> {
        let amounts = self
            .lines()
            .map(|line| line.map(|line| line.amount))
            .collect::<Result<SmallVec<[_; 8]>, _>>()?;

        total_amount(amounts, self.catalog.currency())
    }

    /// Quantity of a product in the cart, if present.
    pub fn quantity(&self, product: ProductKey) -> Option<Quantity> {
        self.entries
            .iter()
            .find(|e| e.product == product)
            .map(CartEntry::quantity)
    }

    /// Entries in the order they were first added.
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Cart lines resolved against the catalog, in insertion order.
    pub fn lines(&self) -> impl Iterator<Item = Result<CartLine<'a, 'a>, PricingError>> + '_ {
        let catalog = self.catalog;

        self.entries.iter().filter_map(move |entry| {
            let product = catalog.get(entry.product)?;

            Some(
                line_amount(&product.price, entry.quantity).map(|amount| CartLine {
                    key: entry.product,
                    product,
                    quantity: entry.quantity,
                    amount,
                }),
            )
        })
    }

    /// Total number of units across all entries.
    pub fn units(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| u64::from(e.quantity.get()))
            .sum()
    }

    /// Number of distinct products in the cart.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The catalog this cart draws products from.
    pub fn catalog(&self) -> &'a Catalog<'a> {
        self.catalog
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.catalog.currency()
    }
}
