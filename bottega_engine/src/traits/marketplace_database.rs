use bottega_common::Money;
use thiserror::Error;

use crate::{
    db_types::{FullOrder, NewOrder, NewPayment, OrderStatus, Payment, StatusUpdate, UserIdentity},
    traits::OrderHistory,
};

/// This trait defines the mutating order flow for backends supporting the marketplace engine.
///
/// This behaviour includes:
/// * Placing new orders, snapshotting prices and decrementing stock atomically.
/// * Driving orders through the role-based status state machine.
/// * Recording payments and promoting pending orders to paid when the payment is complete.
///
/// Implementations must serialize these operations so that two placements competing for the same stock, or two status
/// changes against the same order, never interleave. Every method is one atomic transaction: any failure rolls back
/// all of its writes.
#[allow(async_fn_in_trait)]
pub trait MarketplaceDatabase: Clone + OrderHistory {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Takes a validated order request for the given customer and, in a single atomic transaction:
    /// * fetches every referenced product in one batch,
    /// * checks availability and stock,
    /// * prices the order (line prices and artisans are snapshotted from the product rows),
    /// * inserts the order with status `pending` and one item row per line,
    /// * decrements each product's stock.
    ///
    /// Returns the stored order with its items.
    ///
    /// ## Failure modes
    /// * `ProductUnavailable` if a line references a product that is absent or inactive.
    /// * `InsufficientStock` if a line asks for more units than are in stock.
    /// * `ValidationError` if the shipping method keyword is unknown or `free` is claimed below the threshold.
    async fn place_order(&self, customer_id: i64, order: NewOrder) -> Result<FullOrder, OrderFlowError>;

    /// Moves an order to a new status on behalf of `requester`, in a single atomic transaction. The edge must be
    /// legal for the requester's role (see [`crate::transitions`]); artisans must own at least one item on the order
    /// and customers must own the order itself. A tracking number is applied only when the order is moving to
    /// `shipped`; notes are applied whenever supplied. Cancellations out of `pending`, `paid` or `processing` by an
    /// admin or the customer return the order's items to stock in the same transaction.
    ///
    /// Returns the refreshed order with its items.
    ///
    /// ## Failure modes
    /// * `OrderNotFound` if no such order exists.
    /// * `Forbidden` if the requester has no standing on this order.
    /// * `InvalidTransition` if the edge is not in the requester's table, with the legal edges spelled out.
    async fn update_order_status(
        &self,
        order_id: i64,
        requester: &UserIdentity,
        update: StatusUpdate,
    ) -> Result<FullOrder, OrderFlowError>;

    /// Records a payment against an order on behalf of `requester`, in a single atomic transaction. The requester
    /// must be an admin or the order's customer. The amount must equal the order total exactly. A `completed`
    /// payment requires the order to be `pending` and moves it to `paid` atomically with the payment insert; other
    /// payment statuses leave the order untouched.
    ///
    /// Returns the stored payment and the order's status after the call.
    ///
    /// ## Failure modes
    /// * `OrderNotFound` if no such order exists.
    /// * `Forbidden` if the requester is neither an admin nor the order's customer.
    /// * `AmountMismatch` if the amount differs from the order total by even one cent.
    /// * `InvalidOrderState` if a completed payment targets a non-pending order.
    /// * `DuplicatePayment` / `DuplicateTransactionId` if the order already has a payment, or the transaction id was
    ///   already used.
    async fn record_payment(
        &self,
        requester: &UserIdentity,
        payment: NewPayment,
    ) -> Result<(Payment, OrderStatus), OrderFlowError>;
}

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("The requested order (id {0}) does not exist")]
    OrderNotFound(i64),
    #[error("{0}")]
    Forbidden(String),
    #[error("Order {order_id} cannot move from {from} to {to}. {explanation}")]
    InvalidTransition { order_id: i64, from: OrderStatus, to: OrderStatus, explanation: String },
    #[error("Product {0} is not available")]
    ProductUnavailable(i64),
    #[error("Insufficient stock for {product_name}: {available} available, {requested} requested")]
    InsufficientStock { product_name: String, available: i64, requested: i64 },
    #[error("Payment amount {received} does not match the order total {expected}")]
    AmountMismatch { expected: Money, received: Money },
    #[error("A completed payment requires a pending order, but order {order_id} is {status}")]
    InvalidOrderState { order_id: i64, status: OrderStatus },
    #[error("Order {0} already has a payment recorded against it")]
    DuplicatePayment(i64),
    #[error("Transaction id {0} has already been used")]
    DuplicateTransactionId(String),
}

impl From<sqlx::Error> for OrderFlowError {
    fn from(e: sqlx::Error) -> Self {
        OrderFlowError::DatabaseError(e.to_string())
    }
}
