//! Fixtures
//!
//! Catalogs are described in YAML files under `<base>/catalogs/<name>.yml`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::{
    catalog::{Catalog, CatalogError, Category},
    fixtures::products::{ProductFixture, parse_price},
};

pub mod products;

/// Catalog shipped with the binary.
const BUILTIN_CATALOG: &str = include_str!("../../fixtures/catalogs/default.yml");

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// The catalog lists no products
    #[error("Catalog contains no products")]
    NoProducts,

    /// The fixture describes an inconsistent catalog
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Category as written in a catalog file
#[derive(Debug, Deserialize)]
pub struct CategoryFixture {
    /// Category key
    pub key: String,

    /// Display name, defaults to the key
    #[serde(default)]
    pub name: Option<String>,
}

/// Wrapper for a catalog in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Categories in display order
    pub categories: Vec<CategoryFixture>,

    /// Products in display order
    pub products: Vec<ProductFixture>,
}

impl CatalogFixture {
    /// Build a catalog. The currency is taken from the first product.
    ///
    /// # Errors
    ///
    /// Returns an error if a price is invalid, the catalog is empty, or
    /// the products are inconsistent with each other.
    pub fn into_catalog(self) -> Result<Catalog<'static>, FixtureError> {
        let first = self.products.first().ok_or(FixtureError::NoProducts)?;
        let (_minor_units, currency) = parse_price(&first.price)?;

        let mut catalog = Catalog::new(currency);

        for category in self.categories {
            let name = category.name.unwrap_or_else(|| category.key.clone());

            catalog.add_category(Category::new(category.key, name))?;
        }

        for product_fixture in self.products {
            let (key, product) = product_fixture.into_keyed_product()?;

            catalog.insert(key, product)?;
        }

        Ok(catalog)
    }
}

/// Parse a catalog from YAML text.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or describes an invalid catalog.
pub fn catalog_from_str(yaml: &str) -> Result<Catalog<'static>, FixtureError> {
    let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

    fixture.into_catalog()
}

/// Load a catalog from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn catalog_from_path(path: &Path) -> Result<Catalog<'static>, FixtureError> {
    let contents = fs::read_to_string(path)?;
    let catalog = catalog_from_str(&contents)?;

    info!(
        path = %path.display(),
        products = catalog.len(),
        currency = catalog.currency().iso_alpha_code,
        "catalog loaded"
    );

    Ok(catalog)
}

/// The default catalog compiled into the crate.
///
/// # Errors
///
/// Returns an error if the embedded catalog is invalid.
pub fn builtin_catalog() -> Result<Catalog<'static>, FixtureError> {
    catalog_from_str(BUILTIN_CATALOG)
}

/// Fixture
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,
}

impl Fixture {
    /// Create a fixture loader with the default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a fixture loader with a custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Path of the named catalog file
    pub fn catalog_path(&self, name: &str) -> PathBuf {
        self.base_path.join("catalogs").join(format!("{name}.yml"))
    }

    /// Load a catalog by name from `<base>/catalogs/<name>.yml`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_catalog(&self, name: &str) -> Result<Catalog<'static>, FixtureError> {
        catalog_from_path(&self.catalog_path(name))
    }

    /// Load a catalog file at an explicit path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Catalog<'static>, FixtureError> {
        catalog_from_path(path.as_ref())
    }

    /// The catalog compiled into the crate
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded catalog is invalid.
    pub fn builtin() -> Result<Catalog<'static>, FixtureError> {
        builtin_catalog()
    }

    /// Load a named catalog from the default base path
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn from_set(name: &str) -> Result<Catalog<'static>, FixtureError> {
        Self::new().load_catalog(name)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
