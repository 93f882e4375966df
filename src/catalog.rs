//! Catalog
//!
//! The fixed set of purchasable products, grouped into declared categories.
//! A catalog is assembled once at startup and then shared by reference.

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use slotmap::SlotMap;
use thiserror::Error;

use crate::products::{Product, ProductKey};

/// Errors raised while assembling or querying a catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A product was inserted with a key that is already taken.
    #[error("Duplicate product key: {0}")]
    DuplicateProduct(String),

    /// A category was declared twice.
    #[error("Duplicate category key: {0}")]
    DuplicateCategory(String),

    /// A product refers to a category that was never declared.
    #[error("Product {product} refers to unknown category {category}")]
    UnknownCategory {
        /// Product key
        product: String,
        /// Category key
        category: String,
    },

    /// A product's price is not in the catalog currency (product, product currency, catalog currency).
    #[error("Product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),

    /// A product price was below zero.
    #[error("Product {0} has a negative price")]
    NegativePrice(String),

    /// The product key does not belong to this catalog.
    #[error("Product not found")]
    ProductNotFound(ProductKey),
}

/// Catalog category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Stable key products refer to
    pub key: String,

    /// Display name
    pub name: String,
}

impl Category {
    /// Create a category.
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
        }
    }
}

/// Catalog
#[derive(Debug)]
pub struct Catalog<'a> {
    products: SlotMap<ProductKey, Product<'a>>,

    /// String key -> `SlotMap` key
    keys: FxHashMap<String, ProductKey>,

    /// Declaration order, used for display
    order: Vec<(String, ProductKey)>,

    categories: Vec<Category>,

    currency: &'static Currency,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog priced in `currency`.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            products: SlotMap::with_key(),
            keys: FxHashMap::default(),
            order: Vec::new(),
            categories: Vec::new(),
            currency,
        }
    }

    /// Declare a category. Categories are listed in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateCategory`] if the key is already declared.
    pub fn add_category(&mut self, category: Category) -> Result<&mut Self, CatalogError> {
        if self.has_category(&category.key) {
            return Err(CatalogError::DuplicateCategory(category.key));
        }

        self.categories.push(category);

        Ok(self)
    }

    /// Insert a product under a string key and return its generated key.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the key is taken, the category is unknown,
    /// or the price is negative or in another currency.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        product: Product<'a>,
    ) -> Result<ProductKey, CatalogError> {
        let key = key.into();

        if self.keys.contains_key(&key) {
            return Err(CatalogError::DuplicateProduct(key));
        }

        if !self.has_category(&product.category) {
            return Err(CatalogError::UnknownCategory {
                product: key,
                category: product.category,
            });
        }

        let product_currency = product.price.currency();

        if product_currency != self.currency {
            return Err(CatalogError::CurrencyMismatch(
                key,
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if product.price.to_minor_units() < 0 {
            return Err(CatalogError::NegativePrice(key));
        }

        let product_key = self.products.insert(product);

        self.keys.insert(key.clone(), product_key);
        self.order.push((key, product_key));

        Ok(product_key)
    }

    /// Get a product by key.
    pub fn get(&self, key: ProductKey) -> Option<&Product<'a>> {
        self.products.get(key)
    }

    /// Get a product by key.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] if the key is not in this catalog.
    pub fn product(&self, key: ProductKey) -> Result<&Product<'a>, CatalogError> {
        self.get(key).ok_or(CatalogError::ProductNotFound(key))
    }

    /// Look up a product key by its string key.
    pub fn key(&self, key: &str) -> Option<ProductKey> {
        self.keys.get(key).copied()
    }

    /// String key a product was inserted under.
    pub fn key_str(&self, key: ProductKey) -> Option<&str> {
        self.order
            .iter()
            .find(|(_, product_key)| *product_key == key)
            .map(|(key_str, _)| key_str.as_str())
    }

    /// Resolve a user query: an exact string key, or a product name ignoring case.
    pub fn find(&self, query: &str) -> Option<ProductKey> {
        let query = query.trim();

        self.key(query).or_else(|| {
            let query = query.to_lowercase();

            self.iter()
                .find(|(_, product)| product.name.to_lowercase() == query)
                .map(|(key, _)| key)
        })
    }

    /// Iterate over products in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (ProductKey, &Product<'a>)> {
        self.order
            .iter()
            .filter_map(|(_, key)| self.products.get(*key).map(|product| (*key, product)))
    }

    /// Iterate over the products in one category, in declaration order.
    pub fn in_category<'s>(
        &'s self,
        category: &'s str,
    ) -> impl Iterator<Item = (ProductKey, &'s Product<'a>)> + 's {
        self.iter()
            .filter(move |(_, product)| product.category == category)
    }

    /// Declared categories, in display order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by exact key, falling back to the display name ignoring case.
    pub fn category(&self, query: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|category| category.key == query)
            .or_else(|| {
                let query = query.to_lowercase();

                self.categories
                    .iter()
                    .find(|category| category.name.to_lowercase() == query)
            })
    }

    fn has_category(&self, key: &str) -> bool {
        self.categories.iter().any(|category| category.key == key)
    }

    /// Currency all prices are in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
