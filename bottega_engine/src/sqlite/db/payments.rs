use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewPayment, Payment},
    traits::{OrderFlowError, OrderQueryError},
};

/// Inserts a payment. The schema enforces at most one payment per order and globally unique transaction ids;
/// violating either surfaces as the matching `OrderFlowError` variant rather than a raw database error.
pub async fn insert_payment(payment: &NewPayment, conn: &mut SqliteConnection) -> Result<Payment, OrderFlowError> {
    let result = sqlx::query_as::<_, Payment>(
        r#"
            INSERT INTO payments (order_id, amount, payment_method, transaction_id, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(payment.order_id)
    .bind(payment.amount)
    .bind(payment.payment_method)
    .bind(payment.transaction_id.as_deref())
    .bind(payment.status)
    .fetch_one(conn)
    .await;
    match result {
        Ok(stored) => {
            debug!("📝️ Payment [{}] recorded against order {}", stored.id, stored.order_id);
            Ok(stored)
        },
        Err(e) => Err(map_uniqueness_error(e, payment)),
    }
}

fn map_uniqueness_error(e: sqlx::Error, payment: &NewPayment) -> OrderFlowError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            let message = db_err.message();
            if message.contains("payments.order_id") {
                return OrderFlowError::DuplicatePayment(payment.order_id);
            }
            if message.contains("payments.transaction_id") {
                return OrderFlowError::DuplicateTransactionId(payment.transaction_id.clone().unwrap_or_default());
            }
        }
    }
    e.into()
}

pub async fn fetch_payment_for_order(
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Payment>, OrderQueryError> {
    let payment =
        sqlx::query_as("SELECT * FROM payments WHERE order_id = $1").bind(order_id).fetch_optional(conn).await?;
    Ok(payment)
}
