use std::collections::HashMap;

use log::trace;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{NewProduct, Product},
    traits::OrderFlowError,
};

/// Fetches every product with an id in `ids`, keyed by id. Missing ids are simply absent from the map.
pub async fn fetch_products_by_ids(
    ids: &[i64],
    conn: &mut SqliteConnection,
) -> Result<HashMap<i64, Product>, OrderFlowError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let mut builder = QueryBuilder::new("SELECT * FROM products WHERE id IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
    let query = builder.build_query_as::<Product>();
    trace!("📝️ Fetching {} products by id", ids.len());
    let products = query.fetch_all(conn).await?;
    Ok(products.into_iter().map(|p| (p.id, p)).collect())
}

/// Takes `quantity` units of the product out of stock. The update is guarded: if fewer than `quantity` units remain
/// the row is left untouched and `false` is returned, so callers can roll their transaction back.
pub async fn decrement_stock(
    product_id: i64,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<bool, OrderFlowError> {
    let result = sqlx::query(
        r#"
            UPDATE products
            SET stock_quantity = stock_quantity - $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND stock_quantity >= $1
        "#,
    )
    .bind(quantity)
    .bind(product_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Puts `quantity` units of the product back into stock.
pub async fn restore_stock(
    product_id: i64,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<(), OrderFlowError> {
    sqlx::query(
        r#"
            UPDATE products
            SET stock_quantity = stock_quantity + $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2
        "#,
    )
    .bind(quantity)
    .bind(product_id)
    .execute(conn)
    .await?;
    trace!("📝️ Returned {quantity} units of product {product_id} to stock");
    Ok(())
}

/// Inserts a product. This is a provisioning helper; the engine itself never creates products.
pub async fn insert_product(product: NewProduct, conn: &mut SqliteConnection) -> Result<Product, OrderFlowError> {
    let product = sqlx::query_as(
        r#"
            INSERT INTO products (artisan_id, name, description, price, stock_quantity, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(product.artisan_id)
    .bind(product.name)
    .bind(product.description)
    .bind(product.price)
    .bind(product.stock_quantity)
    .bind(product.is_active)
    .fetch_one(conn)
    .await?;
    Ok(product)
}

/// Fetches a single product, if it exists.
pub async fn fetch_product_by_id(
    product_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM products WHERE id = $1").bind(product_id).fetch_optional(conn).await
}
