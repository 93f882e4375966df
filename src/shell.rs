//! Shell
//!
//! Line-oriented front end over a [`Cart`]. Every user gesture of the shop
//! (browse, add, remove, clear, pay, check out) is a command; invalid input
//! produces a message and never ends the session.

use std::{
    fmt,
    io::{self, BufRead, Write},
    ops::RangeInclusive,
    str::FromStr,
};

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    cart::Cart,
    catalog::Catalog,
    checkout::{Checkout, CheckoutError, Payment, PaymentKind},
    pricing::format_amount,
    quantity::Quantity,
    receipt::ReceiptError,
    views::{RenderError, write_cart, write_catalog, write_categories},
};

/// Quantities accepted per interactive add.
pub const QUANTITY_RANGE: RangeInclusive<u32> = 1..=100;

const HELP: &str = "\
Commands:
  categories                 list categories
  catalog [category]         list products, optionally for one category
  add <product> [quantity]   add a product (quantity 1-100, asked when omitted)
  remove <product>           remove a product from the cart
  cart                       show the cart
  clear                      empty the cart
  pay cash | pay card [no.]  choose how to pay
  checkout                   place the order
  help                       show this message
  quit                       leave the shop";

/// Fatal shell errors.
#[derive(Debug, Error)]
pub enum ShellError {
    /// Reading input or writing output failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A view could not be rendered.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The receipt could not be written.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),
}

/// Rejected user input. Shown to the user, never fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// A command needed a product and none was given.
    #[error("Please choose a product")]
    NoProduct,

    /// The product is not in the catalog.
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// The category is not in the catalog.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// The quantity is outside [`QUANTITY_RANGE`].
    #[error("Quantity must be between 1 and 100, got {0}")]
    QuantityOutOfRange(String),

    /// The quantity is not a whole number.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// The payment method is neither cash nor card.
    #[error("Unknown payment method: {0}, use `pay cash` or `pay card <number>`")]
    UnknownPayment(String),

    /// The command is not recognised.
    #[error("Unknown command: {0}, type `help` for a list of commands")]
    UnknownCommand(String),
}

/// Parse a quantity typed by the user, enforcing [`QUANTITY_RANGE`].
///
/// # Errors
///
/// Returns an [`InputError`] if the input is not a whole number in range.
pub fn parse_quantity(input: &str) -> Result<Quantity, InputError> {
    let input = input.trim();

    if !is_integer(input) {
        return Err(InputError::InvalidQuantity(input.to_string()));
    }

    input
        .parse::<u32>()
        .ok()
        .filter(|units| QUANTITY_RANGE.contains(units))
        .and_then(|units| Quantity::new(units).ok())
        .ok_or_else(|| InputError::QuantityOutOfRange(input.to_string()))
}

/// Digits, optionally after a leading `-`. Any magnitude.
fn is_integer(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);

    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the help text
    Help,

    /// List categories
    Categories,

    /// List products, optionally for one category
    Catalog(Option<String>),

    /// Add a product; the quantity is asked for when missing
    Add {
        /// Product key or name
        product: String,
        /// Quantity as typed
        quantity: Option<String>,
    },

    /// Remove a product
    Remove(String),

    /// Show the cart
    Cart,

    /// Empty the cart after confirmation
    Clear,

    /// Select the payment method
    Pay {
        /// Cash or card
        kind: PaymentKind,
        /// Card number, if given
        card_number: Option<String>,
    },

    /// Place the order after confirmation
    Checkout,

    /// Leave
    Quit,
}

impl FromStr for Command {
    type Err = InputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let argument = (!rest.is_empty()).then(|| rest.to_string());

        match name.to_lowercase().as_str() {
            "help" | "?" => Ok(Command::Help),
            "categories" => Ok(Command::Categories),
            "catalog" | "list" => Ok(Command::Catalog(argument)),
            "add" => parse_add(rest),
            "remove" | "rm" => argument.map(Command::Remove).ok_or(InputError::NoProduct),
            "cart" => Ok(Command::Cart),
            "clear" => Ok(Command::Clear),
            "pay" => parse_pay(rest),
            "checkout" | "order" => Ok(Command::Checkout),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(InputError::UnknownCommand(name.to_string())),
        }
    }
}

impl Command {
    /// Command keyword, safe to log.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Categories => "categories",
            Command::Catalog(_) => "catalog",
            Command::Add { .. } => "add",
            Command::Remove(_) => "remove",
            Command::Cart => "cart",
            Command::Clear => "clear",
            Command::Pay { .. } => "pay",
            Command::Checkout => "checkout",
            Command::Quit => "quit",
        }
    }
}

/// `add <product words...> [quantity]`: a trailing integer is the quantity.
fn parse_add(rest: &str) -> Result<Command, InputError> {
    if rest.is_empty() {
        return Err(InputError::NoProduct);
    }

    let (product, quantity) = match rest.rsplit_once(char::is_whitespace) {
        Some((head, last)) if is_integer(last) => {
            (head.trim().to_string(), Some(last.to_string()))
        }
        _ => (rest.to_string(), None),
    };

    Ok(Command::Add { product, quantity })
}

fn parse_pay(rest: &str) -> Result<Command, InputError> {
    let (method, number) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let number = number.trim();

    match method.to_lowercase().as_str() {
        "cash" => Ok(Command::Pay {
            kind: PaymentKind::Cash,
            card_number: None,
        }),
        "card" => Ok(Command::Pay {
            kind: PaymentKind::Card,
            card_number: (!number.is_empty()).then(|| number.to_string()),
        }),
        other => Err(InputError::UnknownPayment(other.to_string())),
    }
}

/// Whether the session continues after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Interactive shop session.
#[derive(Debug)]
pub struct Shell<'a, R, W> {
    cart: Cart<'a>,
    payment: PaymentKind,
    card_number: String,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    /// Create a session with an empty cart over `catalog`.
    pub fn new(catalog: &'a Catalog<'a>, input: R, output: W) -> Self {
        Self {
            cart: Cart::new(catalog),
            payment: PaymentKind::default(),
            card_number: String::new(),
            input,
            output,
        }
    }

    /// Preselect a payment method.
    #[must_use]
    pub fn with_payment(mut self, payment: PaymentKind) -> Self {
        self.payment = payment;
        self
    }

    /// The session's cart.
    pub fn cart(&self) -> &Cart<'a> {
        &self.cart
    }

    /// Selected payment method.
    pub fn payment(&self) -> PaymentKind {
        self.payment
    }

    /// Run until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns a [`ShellError`] if reading or writing fails.
    pub fn run(&mut self) -> Result<(), ShellError> {
        writeln!(
            self.output,
            "Welcome! {} products in {} categories. Type `help` for commands.",
            self.cart.catalog().len(),
            self.cart.catalog().categories().len()
        )?;

        loop {
            let Some(line) = self.prompt("> ")? else {
                break;
            };

            if line.trim().is_empty() {
                continue;
            }

            let flow = match line.parse::<Command>() {
                Ok(command) => self.execute(command)?,
                Err(error) => {
                    self.notice(&error)?;
                    Flow::Continue
                }
            };

            if flow == Flow::Quit {
                break;
            }
        }

        writeln!(self.output, "Goodbye!")?;
        info!("session ended");

        Ok(())
    }

    /// Execute a single command.
    fn execute(&mut self, command: Command) -> Result<Flow, ShellError> {
        debug!(command = command.name(), "executing command");

        match command {
            Command::Help => writeln!(self.output, "{HELP}")?,
            Command::Categories => write_categories(&mut self.output, self.cart.catalog())?,
            Command::Catalog(category) => self.show_catalog(category.as_deref())?,
            Command::Add { product, quantity } => self.add(&product, quantity.as_deref())?,
            Command::Remove(product) => self.remove(&product)?,
            Command::Cart => write_cart(&mut self.output, &self.cart)?,
            Command::Clear => self.clear()?,
            Command::Pay { kind, card_number } => self.select_payment(kind, card_number)?,
            Command::Checkout => self.checkout()?,
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn show_catalog(&mut self, category: Option<&str>) -> Result<(), ShellError> {
        let catalog = self.cart.catalog();

        if let Some(query) = category
            && catalog.category(query).is_none()
        {
            return self.notice(&InputError::UnknownCategory(query.to_string()));
        }

        write_catalog(&mut self.output, catalog, category)?;

        Ok(())
    }

    fn add(&mut self, query: &str, quantity: Option<&str>) -> Result<(), ShellError> {
        let catalog = self.cart.catalog();

        let Some(key) = catalog.find(query) else {
            return self.notice(&InputError::UnknownProduct(query.to_string()));
        };

        let Ok(product) = catalog.product(key) else {
            return self.notice(&InputError::UnknownProduct(query.to_string()));
        };

        let quantity = match quantity {
            Some(input) => input.to_string(),
            None => {
                let question = format!("Quantity of {} (1-100): ", product.name);

                match self.prompt(&question)? {
                    Some(input) if !input.trim().is_empty() => input,
                    _ => return self.notice(&"Nothing added."),
                }
            }
        };

        let quantity = match parse_quantity(&quantity) {
            Ok(quantity) => quantity,
            Err(error) => return self.notice(&error),
        };

        match self.cart.add(key, quantity) {
            Ok(stored) => {
                writeln!(
                    self.output,
                    "Added {quantity} x {} ({stored} in cart).",
                    product.name
                )?;

                self.show_total()
            }
            Err(error) => self.notice(&error),
        }
    }

    fn remove(&mut self, query: &str) -> Result<(), ShellError> {
        let catalog = self.cart.catalog();

        let Some(key) = catalog.find(query) else {
            return self.notice(&InputError::UnknownProduct(query.to_string()));
        };

        let name = catalog
            .get(key)
            .map_or_else(|| query.to_string(), |product| product.name.clone());

        if self.cart.remove(key).is_some() {
            writeln!(self.output, "Removed {name}.")?;

            self.show_total()
        } else {
            self.notice(&format!("{name} is not in your cart."))
        }
    }

    fn clear(&mut self) -> Result<(), ShellError> {
        if self.confirm("Clear the whole cart?")? {
            self.cart.clear();

            writeln!(self.output, "Cart cleared.")?;
        }

        Ok(())
    }

    fn select_payment(
        &mut self,
        kind: PaymentKind,
        card_number: Option<String>,
    ) -> Result<(), ShellError> {
        self.payment = kind;

        if let Some(number) = card_number {
            self.card_number = number;
        }

        match kind {
            PaymentKind::Cash => writeln!(self.output, "Paying by cash.")?,
            PaymentKind::Card if self.card_number.trim().is_empty() => writeln!(
                self.output,
                "Paying by card. Enter the number with `pay card <number>`."
            )?,
            PaymentKind::Card => writeln!(self.output, "Paying by card.")?,
        }

        Ok(())
    }

    fn checkout(&mut self) -> Result<(), ShellError> {
        if self.cart.is_empty() {
            return self.notice(&CheckoutError::EmptyCart);
        }

        let order = match Payment::select(self.payment, &self.card_number)
            .and_then(|payment| Checkout::prepare(&self.cart, payment))
        {
            Ok(order) => order,
            Err(error) => return self.notice(&error),
        };

        if !self.confirm(&order.confirmation_prompt())? {
            writeln!(self.output, "Order cancelled.")?;

            return Ok(());
        }

        let receipt = order.confirm(&mut self.cart);

        receipt.write_to(&mut self.output)?;

        Ok(())
    }

    fn show_total(&mut self) -> Result<(), ShellError> {
        match self.cart.total() {
            Ok(total) => writeln!(self.output, "Cart total: {}", format_amount(&total))?,
            Err(error) => self.notice(&error)?,
        }

        Ok(())
    }

    /// Ask a yes/no question. Anything but `y`/`yes` is a no.
    fn confirm(&mut self, question: &str) -> Result<bool, ShellError> {
        let answer = self.prompt(&format!("{question} [y/N] "))?;

        Ok(answer.is_some_and(|answer| {
            matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
        }))
    }

    /// Print a prompt and read one line. `None` at end of input.
    fn prompt(&mut self, prompt: &str) -> Result<Option<String>, ShellError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();

        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;

            return Ok(None);
        }

        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Informational message for rejected input.
    fn notice(&mut self, message: &dyn fmt::Display) -> Result<(), ShellError> {
        debug!(%message, "input rejected");

        writeln!(self.output, "! {message}")?;

        Ok(())
    }
}
