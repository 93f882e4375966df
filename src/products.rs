//! Products

use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Product name
    pub name: String,

    /// Key of the catalog category the product is listed under
    pub category: String,

    /// Product price
    pub price: Money<'a, Currency>,

    /// Optional image reference shown alongside the receipt
    pub image: Option<String>,
}

impl<'a> Product<'a> {
    /// Create a product without an image.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        price: Money<'a, Currency>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            price,
            image: None,
        }
    }

    /// Attach an image reference to the product.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}
