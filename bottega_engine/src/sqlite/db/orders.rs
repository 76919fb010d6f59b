use log::trace;
use sqlx::{Execute, FromRow, QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    api::order_objects::OrderQueryFilter,
    db_types::{NewOrder, Order, OrderItem, OrderLine, OrderStatus, Product},
    pricing::PricedOrder,
    traits::{OrderFlowError, OrderQueryError},
};

/// Inserts a new pending order using the given connection. This is not atomic on its own. Embed this call inside a
/// transaction and pass `&mut *tx` as the connection argument to make it part of the placement transaction.
pub async fn insert_order(
    customer_id: i64,
    order: &NewOrder,
    priced: &PricedOrder,
    conn: &mut SqliteConnection,
) -> Result<Order, OrderFlowError> {
    let order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                customer_id,
                status,
                total_amount,
                shipping_address,
                billing_address,
                shipping_method,
                notes
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *;
        "#,
    )
    .bind(customer_id)
    .bind(OrderStatus::Pending)
    .bind(priced.total)
    .bind(order.shipping_address.as_str())
    .bind(order.billing_address.as_deref())
    .bind(priced.shipping_method)
    .bind(order.notes.as_deref())
    .fetch_one(conn)
    .await?;
    Ok(order)
}

/// Inserts one order line, snapshotting the unit price and the artisan from the product row.
pub async fn insert_order_item(
    order_id: i64,
    line: &OrderLine,
    product: &Product,
    conn: &mut SqliteConnection,
) -> Result<OrderItem, OrderFlowError> {
    let item = sqlx::query_as(
        r#"
            INSERT INTO order_items (order_id, product_id, artisan_id, quantity, price_per_unit)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(order_id)
    .bind(line.product_id)
    .bind(product.artisan_id)
    .bind(line.quantity)
    .bind(product.price)
    .fetch_one(conn)
    .await?;
    Ok(item)
}

pub async fn fetch_order_by_id(order_id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(order_id).fetch_optional(conn).await
}

pub async fn fetch_order_items(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id")
        .bind(order_id)
        .fetch_all(conn)
        .await
}

/// Whether the artisan sells at least one item on the order.
pub async fn artisan_has_items(
    order_id: i64,
    artisan_id: i64,
    conn: &mut SqliteConnection,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM order_items WHERE order_id = $1 AND artisan_id = $2)")
        .bind(order_id)
        .bind(artisan_id)
        .fetch_one(conn)
        .await
}

/// Applies a status change to the order row, bumping `updated_at` and setting the tracking number and notes when
/// given. Returns the updated row, or `None` if the order does not exist.
pub async fn update_order(
    order_id: i64,
    status: OrderStatus,
    tracking_number: Option<&str>,
    notes: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, OrderFlowError> {
    let mut builder = QueryBuilder::new("UPDATE orders SET status = ");
    builder.push_bind(status);
    builder.push(", updated_at = CURRENT_TIMESTAMP");
    if let Some(tracking_number) = tracking_number {
        builder.push(", tracking_number = ");
        builder.push_bind(tracking_number);
    }
    if let Some(notes) = notes {
        builder.push(", notes = ");
        builder.push_bind(notes);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(order_id);
    builder.push(" RETURNING *");
    let row = builder.build().fetch_optional(conn).await?;
    let order = row.map(|r| Order::from_row(&r)).transpose()?;
    Ok(order)
}

/// Runs the filter against the orders table, returning the requested page, newest orders first.
pub async fn search_orders(
    query: OrderQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, OrderQueryError> {
    let mut builder = QueryBuilder::new("SELECT * FROM orders");
    push_search_conditions(&query, &mut builder);
    builder.push(" ORDER BY created_at DESC, id DESC");
    builder.push(" LIMIT ");
    builder.push_bind(query.limit());
    builder.push(" OFFSET ");
    builder.push_bind(query.offset());
    let q = builder.build_query_as::<Order>();
    trace!("📝️ Executing query: {}", q.sql());
    let orders = q.fetch_all(conn).await?;
    Ok(orders)
}

/// Counts the orders the filter matches, ignoring pagination.
pub async fn count_orders(query: &OrderQueryFilter, conn: &mut SqliteConnection) -> Result<i64, OrderQueryError> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM orders");
    push_search_conditions(query, &mut builder);
    let count: i64 = builder.build_query_scalar().fetch_one(conn).await?;
    Ok(count)
}

fn push_search_conditions(query: &OrderQueryFilter, builder: &mut QueryBuilder<'_, Sqlite>) {
    if !query.has_conditions() {
        return;
    }
    builder.push(" WHERE ");
    let mut separated = builder.separated(" AND ");
    if let Some(customer_id) = query.customer_id {
        separated.push("customer_id = ");
        separated.push_bind_unseparated(customer_id);
    }
    if let Some(artisan_id) = query.artisan_id {
        separated.push("id IN (SELECT DISTINCT order_id FROM order_items WHERE artisan_id = ");
        separated.push_bind_unseparated(artisan_id);
        separated.push_unseparated(")");
    }
    if let Some(statuses) = &query.status {
        if !statuses.is_empty() {
            separated.push("status IN (");
            for (i, status) in statuses.iter().enumerate() {
                if i > 0 {
                    separated.push_unseparated(", ");
                }
                separated.push_bind_unseparated(*status);
            }
            separated.push_unseparated(")");
        }
    }
    if let Some(since) = query.since {
        separated.push("created_at >= ");
        separated.push_bind_unseparated(since.format("%Y-%m-%d %H:%M:%S").to_string());
    }
    if let Some(until) = query.until {
        separated.push("created_at <= ");
        separated.push_bind_unseparated(until.format("%Y-%m-%d %H:%M:%S").to_string());
    }
}
