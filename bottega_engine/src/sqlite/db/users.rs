use sqlx::SqliteConnection;

use crate::{db_types::Role, traits::OrderFlowError};

/// Inserts a user and returns its id. This is a provisioning helper; the engine never manages user records itself,
/// but orders and products reference them.
pub async fn insert_user(username: &str, role: Role, conn: &mut SqliteConnection) -> Result<i64, OrderFlowError> {
    let id: i64 = sqlx::query_scalar("INSERT INTO users (username, role) VALUES ($1, $2) RETURNING id")
        .bind(username)
        .bind(role)
        .fetch_one(conn)
        .await?;
    Ok(id)
}
