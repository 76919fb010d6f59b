//! Seeding helpers. Integration tests build their fixtures through these rather than hand-writing SQL.

use bottega_common::Money;

use crate::{
    db_types::{NewProduct, Product, Role, UserIdentity},
    sqlite::db::{products, users},
    traits::OrderFlowError,
    SqliteDatabase,
};

/// Inserts a user with the given name and role, returning an identity to act as in tests.
pub async fn seed_user(db: &SqliteDatabase, username: &str, role: Role) -> Result<UserIdentity, OrderFlowError> {
    let mut conn = db.pool().acquire().await?;
    let user_id = users::insert_user(username, role, &mut conn).await?;
    Ok(UserIdentity::new(user_id, role))
}

/// Inserts a product owned by the given artisan and returns the stored row.
pub async fn seed_product(
    db: &SqliteDatabase,
    artisan: &UserIdentity,
    name: &str,
    price: Money,
    stock_quantity: i64,
) -> Result<Product, OrderFlowError> {
    let mut conn = db.pool().acquire().await?;
    let product = NewProduct::new(artisan.user_id, name, price, stock_quantity);
    products::insert_product(product, &mut conn).await
}

/// Inserts a product that has been taken off the shelves.
pub async fn seed_inactive_product(
    db: &SqliteDatabase,
    artisan: &UserIdentity,
    name: &str,
    price: Money,
) -> Result<Product, OrderFlowError> {
    let mut conn = db.pool().acquire().await?;
    let product = NewProduct::new(artisan.user_id, name, price, 10).inactive();
    products::insert_product(product, &mut conn).await
}

/// Reads a product row back, so tests can check stock levels after the fact.
pub async fn fetch_product(db: &SqliteDatabase, product_id: i64) -> Result<Product, OrderFlowError> {
    let mut conn = db.pool().acquire().await?;
    let product = products::fetch_product_by_id(product_id, &mut conn).await?;
    product.ok_or_else(|| OrderFlowError::DatabaseError(format!("Product {product_id} is missing")))
}
