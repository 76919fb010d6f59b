use thiserror::Error;

use crate::{
    api::order_objects::OrderQueryFilter,
    db_types::{FullOrder, Order, Payment},
};

#[derive(Debug, Clone, Error)]
pub enum OrderQueryError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("User error constructing query: {0}")]
    QueryError(String),
    #[error("The requested order (id {0}) does not exist")]
    OrderNotFound(i64),
    #[error("No payment has been recorded against order {0}")]
    PaymentNotFound(i64),
    #[error("{0}")]
    Forbidden(String),
}

impl From<sqlx::Error> for OrderQueryError {
    fn from(e: sqlx::Error) -> Self {
        OrderQueryError::DatabaseError(e.to_string())
    }
}

/// The `OrderHistory` trait defines the read side of the marketplace store: order lookups, searches and payment
/// lookups.
///
/// These methods carry no visibility rules. [`crate::api::OrderQueryApi`] scopes searches to the caller and refuses
/// to hand back orders the caller may not see; backends just answer the question asked.
#[allow(async_fn_in_trait)]
pub trait OrderHistory {
    /// Fetches the order with the given id, together with its items. If no such order exists, `None` is returned.
    async fn fetch_order(&self, order_id: i64) -> Result<Option<FullOrder>, OrderQueryError>;

    /// Runs the query filter, returning the requested page of matching orders and the total number of matches
    /// (before pagination).
    async fn search_orders(&self, query: OrderQueryFilter) -> Result<(Vec<Order>, i64), OrderQueryError>;

    /// Fetches the payment recorded against the given order, if there is one.
    async fn payment_for_order(&self, order_id: i64) -> Result<Option<Payment>, OrderQueryError>;
}
