//! Kiosk prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartEntry, CartError, CartLine},
    catalog::{Catalog, CatalogError, Category},
    checkout::{CardNumber, Checkout, CheckoutError, Payment, PaymentKind, PendingOrder},
    fixtures::{Fixture, FixtureError, builtin_catalog, catalog_from_path, catalog_from_str},
    pricing::{PricingError, format_amount},
    products::{Product, ProductKey},
    quantity::{Quantity, QuantityError},
    receipt::{Receipt, ReceiptError, ReceiptLine},
    shell::{Command, InputError, Shell, ShellError},
};
