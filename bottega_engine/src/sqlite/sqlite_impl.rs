//! `SqliteDatabase` is a concrete implementation of a Bottega market engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
//!
//! SQLite offers no row locks, so exclusive access is arranged differently here than it would be on a server
//! database: all mutating operations run inside a transaction on a pool holding exactly one connection. Whoever owns
//! that connection owns the whole store for the span of their transaction, which serializes competing placements
//! against the same product and competing status changes against the same order. Reads run on a separate,
//! wider pool.
use std::fmt::Debug;

use log::*;
use sqlx::{SqliteConnection, SqlitePool};

use super::db::{db_url, new_pool, orders, payments, products};
use crate::{
    api::order_objects::OrderQueryFilter,
    db_types::{
        FullOrder,
        NewOrder,
        NewPayment,
        Order,
        OrderStatus,
        Payment,
        PaymentStatus,
        Role,
        StatusUpdate,
        UserIdentity,
    },
    pricing,
    traits::{MarketplaceDatabase, OrderFlowError, OrderHistory, OrderQueryError},
    transitions,
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    read_pool: SqlitePool,
    write_pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({})", self.url)
    }
}

impl MarketplaceDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn place_order(&self, customer_id: i64, order: NewOrder) -> Result<FullOrder, OrderFlowError> {
        let mut tx = self.write_pool.begin().await?;
        let ids = order.items.iter().map(|line| line.product_id).collect::<Vec<_>>();
        let catalog = products::fetch_products_by_ids(&ids, &mut tx).await?;
        let priced = pricing::price_order(&order.items, &catalog, order.shipping_method.as_deref())?;
        let stored = orders::insert_order(customer_id, &order, &priced, &mut tx).await?;
        let mut items = Vec::with_capacity(order.items.len());
        for line in &order.items {
            let product = catalog.get(&line.product_id).ok_or(OrderFlowError::ProductUnavailable(line.product_id))?;
            let item = orders::insert_order_item(stored.id, line, product, &mut tx).await?;
            let decremented = products::decrement_stock(line.product_id, line.quantity, &mut tx).await?;
            if !decremented {
                error!(
                    "🗃️ Stock guard rejected {} units of product {} for order {}. Rolling back.",
                    line.quantity, line.product_id, stored.id
                );
                tx.rollback().await?;
                return Err(OrderFlowError::InsufficientStock {
                    product_name: product.name.clone(),
                    available: product.stock_quantity,
                    requested: line.quantity,
                });
            }
            items.push(item);
        }
        tx.commit().await?;
        debug!(
            "🗃️ Order {} stored for customer {customer_id} with {} items. Total: {}",
            stored.id,
            items.len(),
            stored.total_amount
        );
        Ok(FullOrder { order: stored, items })
    }

    async fn update_order_status(
        &self,
        order_id: i64,
        requester: &UserIdentity,
        update: StatusUpdate,
    ) -> Result<FullOrder, OrderFlowError> {
        let mut tx = self.write_pool.begin().await?;
        let order =
            orders::fetch_order_by_id(order_id, &mut tx).await?.ok_or(OrderFlowError::OrderNotFound(order_id))?;
        match requester.role {
            Role::Admin => {},
            Role::Artisan => {
                let involved = orders::artisan_has_items(order_id, requester.user_id, &mut tx).await?;
                if !involved {
                    return Err(OrderFlowError::Forbidden(format!(
                        "Artisan {} has no items on order {order_id}",
                        requester.user_id
                    )));
                }
            },
            Role::Customer => {
                if order.customer_id != requester.user_id {
                    return Err(OrderFlowError::Forbidden(format!(
                        "Order {order_id} does not belong to customer {}",
                        requester.user_id
                    )));
                }
            },
        }
        if !transitions::is_allowed(requester.role, order.status, update.status) {
            return Err(OrderFlowError::InvalidTransition {
                order_id,
                from: order.status,
                to: update.status,
                explanation: transitions::legal_transitions_message(requester.role, order.status),
            });
        }
        let updated = apply_status_change(
            &order,
            requester.role,
            update.status,
            update.tracking_number.as_deref(),
            update.notes.as_deref(),
            &mut tx,
        )
        .await?;
        let items = orders::fetch_order_items(order_id, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order {order_id} moved from {} to {} by {requester}", order.status, updated.status);
        Ok(FullOrder { order: updated, items })
    }

    async fn record_payment(
        &self,
        requester: &UserIdentity,
        payment: NewPayment,
    ) -> Result<(Payment, OrderStatus), OrderFlowError> {
        let mut tx = self.write_pool.begin().await?;
        let order = orders::fetch_order_by_id(payment.order_id, &mut tx)
            .await?
            .ok_or(OrderFlowError::OrderNotFound(payment.order_id))?;
        if !(requester.is_admin() || order.customer_id == requester.user_id) {
            return Err(OrderFlowError::Forbidden(format!(
                "{requester} cannot record payments against order {}",
                order.id
            )));
        }
        if payment.amount != order.total_amount {
            return Err(OrderFlowError::AmountMismatch { expected: order.total_amount, received: payment.amount });
        }
        if payment.status == PaymentStatus::Completed && order.status != OrderStatus::Pending {
            return Err(OrderFlowError::InvalidOrderState { order_id: order.id, status: order.status });
        }
        let stored = payments::insert_payment(&payment, &mut tx).await?;
        let order_status = if payment.status == PaymentStatus::Completed {
            // The promotion to paid rides the same mutation routine as an explicit transition. The gate is the
            // payment status, not the role table.
            let updated = apply_status_change(&order, requester.role, OrderStatus::Paid, None, None, &mut tx).await?;
            updated.status
        } else {
            order.status
        };
        tx.commit().await?;
        debug!(
            "🗃️ Payment {} of {} recorded against order {}. The order is now {order_status}",
            stored.id, stored.amount, stored.order_id
        );
        Ok((stored, order_status))
    }
}

impl OrderHistory for SqliteDatabase {
    async fn fetch_order(&self, order_id: i64) -> Result<Option<FullOrder>, OrderQueryError> {
        let mut conn = self.read_pool.acquire().await?;
        let Some(order) = orders::fetch_order_by_id(order_id, &mut conn).await? else {
            return Ok(None);
        };
        let items = orders::fetch_order_items(order_id, &mut conn).await?;
        Ok(Some(FullOrder { order, items }))
    }

    async fn search_orders(&self, query: OrderQueryFilter) -> Result<(Vec<Order>, i64), OrderQueryError> {
        let mut conn = self.read_pool.acquire().await?;
        let total = orders::count_orders(&query, &mut conn).await?;
        let page = orders::search_orders(query, &mut conn).await?;
        trace!("🗃️ Order search matched {total} orders, returning {}", page.len());
        Ok((page, total))
    }

    async fn payment_for_order(&self, order_id: i64) -> Result<Option<Payment>, OrderQueryError> {
        let mut conn = self.read_pool.acquire().await?;
        payments::fetch_payment_for_order(order_id, &mut conn).await
    }
}

/// The one routine that actually mutates an order's status row. Both the explicit transition path and the
/// completed-payment promotion come through here, so the tracking number, notes and stock side effects live in one
/// place. Authorization is the caller's business.
async fn apply_status_change(
    order: &Order,
    role: Role,
    new_status: OrderStatus,
    tracking_number: Option<&str>,
    notes: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<Order, OrderFlowError> {
    // A tracking number only makes sense on the way to shipped.
    let tracking_number = if new_status == OrderStatus::Shipped { tracking_number } else { None };
    let updated = orders::update_order(order.id, new_status, tracking_number, notes, conn)
        .await?
        .ok_or(OrderFlowError::OrderNotFound(order.id))?;
    if transitions::restores_stock(role, order.status, new_status) {
        let items = orders::fetch_order_items(order.id, conn).await?;
        for item in &items {
            products::restore_stock(item.product_id, item.quantity, conn).await?;
        }
        debug!("🗃️ Order {} cancelled from {}. {} line(s) returned to stock", order.id, order.status, items.len());
    }
    Ok(updated)
}

impl SqliteDatabase {
    /// Creates a new database API instance, using the database URL from the `BTG_DATABASE_URL` environment variable.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    /// Creates a new database API instance against the given URL. `max_connections` sizes the read pool; the write
    /// pool always holds a single connection.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pools with url {url}");
        let read_pool = new_pool(url, max_connections).await?;
        let write_pool = new_pool(url, 1).await?;
        let url = url.to_string();
        Ok(Self { url, read_pool, write_pool })
    }

    /// Returns a reference to the read-side connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.read_pool
    }
}
