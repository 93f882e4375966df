//! Kiosk
//!
//! A small shop kiosk: browse a catalog, fill a cart, pay by cash or card
//! and get a receipt.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod fixtures;
pub mod logging;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod quantity;
pub mod receipt;
pub mod shell;
pub mod views;
