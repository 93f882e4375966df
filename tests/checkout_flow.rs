//! Integration test for a full shopping session against the default catalog.
//!
//! Cart:
//!
//! - Apples 1kg: 2 x 90.00 RUB = 180.00 RUB (added as 1 + 1)
//! - Bread loaf: 1 x 50.00 RUB = 50.00 RUB
//!
//! Expected total: 230.00 RUB

use rusty_money::{Money, iso::RUB};
use testresult::TestResult;

use kiosk::{
    prelude::*,
    views::{strip_ansi, write_cart},
};

#[test]
fn test_default_catalog_checkout() -> TestResult {
    let catalog = Fixture::from_set("default")?;

    let apples = catalog.key("apples").ok_or("apples missing")?;
    let bread = catalog.key("bread").ok_or("bread missing")?;

    let mut cart = Cart::new(&catalog);

    cart.add(apples, Quantity::ONE)?;
    cart.add(bread, Quantity::ONE)?;
    cart.add(apples, Quantity::ONE)?;

    assert_eq!(cart.len(), 2);
    assert_eq!(cart.quantity(apples), Some(Quantity::new(2)?));
    assert_eq!(cart.total()?, Money::from_minor(23_000, RUB));

    let mut view = Vec::new();

    write_cart(&mut view, &cart)?;

    assert!(strip_ansi(&String::from_utf8(view)?).contains("Total: 230.00 RUB"));

    let order = Checkout::prepare(&cart, Payment::select(PaymentKind::Card, "4000 0000 0000 0002")?)?;

    assert_eq!(
        order.confirmation_prompt(),
        "Confirm order of 230.00 RUB paid by card **** 0002?"
    );

    let receipt = order.confirm(&mut cart);

    assert!(cart.is_empty());
    assert_eq!(cart.total()?, Money::from_minor(0, RUB));
    assert_eq!(receipt.total(), Money::from_minor(23_000, RUB));
    assert_eq!(receipt.units(), 3);

    let mut printed = Vec::new();

    receipt.write_to(&mut printed)?;

    let printed = strip_ansi(&String::from_utf8(printed)?);

    assert!(printed.contains("card **** 0002"), "{printed}");
    assert!(!printed.contains("4000 0000 0000 0002"), "{printed}");

    Ok(())
}

#[test]
fn test_scripted_shell_session() -> TestResult {
    let catalog = builtin_catalog()?;
    let script = "\
categories
catalog fruit
add apples 1
add bread
1
add Apples 1kg 1
remove milk
cart
pay card
checkout
pay card 4000 0000 0000 0002
checkout
yes
cart
quit
";

    let mut out = Vec::new();

    {
        let mut shell = Shell::new(&catalog, script.as_bytes(), &mut out);

        shell.run()?;

        assert!(shell.cart().is_empty());
        assert_eq!(shell.payment(), PaymentKind::Card);
    }

    let output = strip_ansi(&String::from_utf8(out)?);

    assert!(output.contains("Fruit (2)"), "{output}");
    assert!(output.contains("Bananas 1kg"), "{output}");
    assert!(output.contains("(2 in cart)"), "{output}");
    assert!(output.contains("Milk 1l is not in your cart."), "{output}");
    assert!(output.contains("Please enter a card number"), "{output}");
    assert!(output.contains("paid by card **** 0002?"), "{output}");
    assert!(output.contains("Thank you for your purchase!"), "{output}");
    assert!(output.contains("Your cart is empty."), "{output}");
    assert!(output.contains("Goodbye!"), "{output}");

    Ok(())
}

#[test]
fn test_groceries_catalog_rounds_to_minor_units() -> TestResult {
    let catalog = Fixture::new().load_catalog("groceries")?;

    let croissant = catalog.find("croissant").ok_or("croissant missing")?;
    let sweet = catalog.find("Penny sweet").ok_or("penny sweet missing")?;

    // 0.125 GBP rounds half away from zero to 0.13 GBP when loaded
    assert_eq!(catalog.product(sweet)?.price.to_minor_units(), 13);

    let mut cart = Cart::new(&catalog);

    cart.add(croissant, Quantity::new(3)?)?;
    cart.add(sweet, Quantity::new(3)?)?;

    // 3 x 1.80 + 3 x 0.13
    assert_eq!(format_amount(&cart.total()?), "5.79 GBP");

    Ok(())
}
