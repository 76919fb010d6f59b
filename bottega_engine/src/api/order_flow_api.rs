use std::{collections::HashSet, fmt::Debug};

use log::*;

use crate::{
    db_types::{FullOrder, NewOrder, NewPayment, OrderStatus, Payment, Role, StatusUpdate, UserIdentity},
    traits::{MarketplaceDatabase, OrderFlowError},
};

/// `OrderFlowApi` is the primary API for the order lifecycle: placing orders, moving them through their status
/// graph, and recording payments against them.
pub struct OrderFlowApi<B> {
    db: B,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> OrderFlowApi<B>
where B: MarketplaceDatabase
{
    /// Submit a new order on behalf of the requester.
    ///
    /// Only customers place orders. The request is checked for shape problems (no items, non-positive quantities,
    /// duplicate product lines, a blank shipping address) before the backend prices it and commits it. Any failure
    /// leaves the store untouched.
    pub async fn place_order(&self, requester: &UserIdentity, order: NewOrder) -> Result<FullOrder, OrderFlowError> {
        if requester.role != Role::Customer {
            return Err(OrderFlowError::Forbidden(format!(
                "Only customers can place orders, not {}",
                requester.role
            )));
        }
        validate_new_order(&order)?;
        let full_order = self.db.place_order(requester.user_id, order).await?;
        debug!(
            "🔄️📦️ Order [{}] placed by {requester} with {} item lines. Total: {}",
            full_order.order.id,
            full_order.items.len(),
            full_order.order.total_amount
        );
        Ok(full_order)
    }

    /// Move an order to a new status on behalf of the requester.
    ///
    /// The backend checks that the requester may act on the order at all, and that the requested edge exists in the
    /// transition table for their role. A cancellation out of `pending`, `paid` or `processing` returns the order's
    /// items to stock in the same transaction.
    pub async fn update_status(
        &self,
        order_id: i64,
        requester: &UserIdentity,
        update: StatusUpdate,
    ) -> Result<FullOrder, OrderFlowError> {
        let new_status = update.status;
        let full_order = self.db.update_order_status(order_id, requester, update).await?;
        debug!("🔄️✅️ Order [{order_id}] is now {new_status}, on the word of {requester}");
        Ok(full_order)
    }

    /// Record a payment against an order on behalf of the requester.
    ///
    /// The payment must match the order total exactly. A `completed` payment against a `pending` order promotes the
    /// order to `paid` in the same transaction; the new payment and the order's resulting status are returned.
    pub async fn record_payment(
        &self,
        requester: &UserIdentity,
        payment: NewPayment,
    ) -> Result<(Payment, OrderStatus), OrderFlowError> {
        let order_id = payment.order_id;
        let (payment, order_status) = self.db.record_payment(requester, payment).await?;
        debug!(
            "🔄️💰️ Payment [{}] of {} recorded against order [{order_id}] by {requester}. Order status: {order_status}",
            payment.id, payment.amount
        );
        Ok((payment, order_status))
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }
}

/// Checks a new order request for shape problems before it goes anywhere near the store.
fn validate_new_order(order: &NewOrder) -> Result<(), OrderFlowError> {
    if order.items.is_empty() {
        return Err(OrderFlowError::ValidationError("An order needs at least one item".to_string()));
    }
    if order.items.iter().any(|line| line.quantity <= 0) {
        return Err(OrderFlowError::ValidationError("Item quantities must be positive".to_string()));
    }
    let mut seen = HashSet::new();
    if order.items.iter().any(|line| !seen.insert(line.product_id)) {
        return Err(OrderFlowError::ValidationError("Items contain a duplicate product".to_string()));
    }
    if order.shipping_address.trim().is_empty() {
        return Err(OrderFlowError::ValidationError("A shipping address is required".to_string()));
    }
    Ok(())
}
