//! Order pricing and availability checks.
//!
//! Totals are always computed from the product rows read inside the placement transaction. Client-supplied prices
//! never enter the calculation, so the total for a given cart and shipping method is fully deterministic.

use std::collections::HashMap;

use bottega_common::Money;

use crate::{
    db_types::{OrderLine, Product, ShippingMethod},
    traits::OrderFlowError,
};

/// Orders whose subtotal reaches this value qualify for free shipping.
pub const FREE_SHIPPING_THRESHOLD_CENTS: i64 = 100_00;

/// The outcome of pricing an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedOrder {
    pub shipping_method: Option<ShippingMethod>,
    pub subtotal: Money,
    pub total: Money,
}

/// Validates availability and prices an order against the current product rows.
///
/// The lines are walked in request order. Each line's product must exist in `products` and be active, and must have
/// enough stock for the requested quantity. The subtotal is the sum of unit price times quantity over all lines; the
/// shipping surcharge is then added according to the method keyword.
///
/// ## Failure modes
/// * `ProductUnavailable` if a line references a product that is absent or inactive.
/// * `InsufficientStock` if a line asks for more units than are in stock.
/// * `ValidationError` if the shipping method keyword is unknown, or `free` is requested below the
///   free-shipping threshold.
pub fn price_order(
    lines: &[OrderLine],
    products: &HashMap<i64, Product>,
    shipping_method: Option<&str>,
) -> Result<PricedOrder, OrderFlowError> {
    let mut subtotal = Money::default();
    for line in lines {
        let product = match products.get(&line.product_id) {
            Some(p) if p.is_active => p,
            _ => return Err(OrderFlowError::ProductUnavailable(line.product_id)),
        };
        if product.stock_quantity < line.quantity {
            return Err(OrderFlowError::InsufficientStock {
                product_name: product.name.clone(),
                available: product.stock_quantity,
                requested: line.quantity,
            });
        }
        subtotal += product.price * line.quantity;
    }
    let shipping_method = parse_shipping_method(shipping_method, subtotal)?;
    let surcharge = shipping_method.map(|m| m.surcharge()).unwrap_or_default();
    Ok(PricedOrder { shipping_method, subtotal, total: subtotal + surcharge })
}

fn parse_shipping_method(method: Option<&str>, subtotal: Money) -> Result<Option<ShippingMethod>, OrderFlowError> {
    let Some(keyword) = method else { return Ok(None) };
    let method = keyword
        .parse::<ShippingMethod>()
        .map_err(|_| OrderFlowError::ValidationError(format!("Invalid shipping method: {keyword}")))?;
    if method == ShippingMethod::Free && subtotal.value() < FREE_SHIPPING_THRESHOLD_CENTS {
        return Err(OrderFlowError::ValidationError(format!(
            "Free shipping requires an order subtotal of at least {}",
            Money::from(FREE_SHIPPING_THRESHOLD_CENTS)
        )));
    }
    Ok(Some(method))
}
