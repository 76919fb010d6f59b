//! Read access to orders and payments, scoped to what the caller is allowed to see.

use std::fmt::Debug;

use log::trace;

use crate::{
    api::order_objects::{OrderList, OrderQueryFilter},
    db_types::{FullOrder, Payment, Role, UserIdentity},
    traits::{OrderHistory, OrderQueryError},
};

/// The `OrderQueryApi` provides a unified API for reading orders and payments.
///
/// Visibility lives here rather than in the backends. Admins see everything. Customers see their own orders.
/// Artisans see orders carrying at least one of their items. Searches are silently narrowed to the caller's scope,
/// while direct lookups of something out of scope are refused outright.
pub struct OrderQueryApi<B> {
    db: B,
}

impl<B: Debug> Debug for OrderQueryApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderQueryApi ({:?})", self.db)
    }
}

impl<B> OrderQueryApi<B>
where B: OrderHistory
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Fetches the order with the given id, together with its items, if the requester may see it.
    pub async fn fetch_order(&self, requester: &UserIdentity, order_id: i64) -> Result<FullOrder, OrderQueryError> {
        let order = self.db.fetch_order(order_id).await?.ok_or(OrderQueryError::OrderNotFound(order_id))?;
        if !can_view_order(requester, &order) {
            return Err(OrderQueryError::Forbidden(format!("{requester} may not view order {order_id}")));
        }
        Ok(order)
    }

    /// Runs an order search on behalf of the requester, returning the requested page of results with pagination
    /// metadata. The filter is narrowed to the requester's scope before it runs.
    pub async fn search_orders(
        &self,
        requester: &UserIdentity,
        query: OrderQueryFilter,
    ) -> Result<OrderList, OrderQueryError> {
        let query = scoped_to(requester, query);
        trace!("Scoped order search for {requester}: {query}");
        let (orders, total_items) = self.db.search_orders(query.clone()).await?;
        Ok(OrderList::new(total_items, &query, orders))
    }

    /// Fetches the payment recorded against the given order. Only admins and the order's customer may look.
    pub async fn payment_for_order(
        &self,
        requester: &UserIdentity,
        order_id: i64,
    ) -> Result<Payment, OrderQueryError> {
        let order = self.db.fetch_order(order_id).await?.ok_or(OrderQueryError::OrderNotFound(order_id))?;
        if !(requester.is_admin() || order.order.customer_id == requester.user_id) {
            return Err(OrderQueryError::Forbidden(format!(
                "{requester} may not view payments for order {order_id}"
            )));
        }
        self.db.payment_for_order(order_id).await?.ok_or(OrderQueryError::PaymentNotFound(order_id))
    }
}

fn can_view_order(requester: &UserIdentity, order: &FullOrder) -> bool {
    match requester.role {
        Role::Admin => true,
        Role::Customer => order.order.customer_id == requester.user_id,
        Role::Artisan => order.items.iter().any(|item| item.artisan_id == requester.user_id),
    }
}

fn scoped_to(requester: &UserIdentity, query: OrderQueryFilter) -> OrderQueryFilter {
    match requester.role {
        Role::Admin => query,
        Role::Customer => query.with_customer_id(requester.user_id),
        Role::Artisan => query.with_artisan_id(requester.user_id),
    }
}
