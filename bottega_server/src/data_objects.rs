use bottega_engine::{
    db_types::{OrderStatus, Payment},
    order_objects::OrderQueryFilter,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ServerError;

/// The response body for a recorded payment: the stored payment and where it left the order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResult {
    pub payment: Payment,
    pub order_status: OrderStatus,
}

/// Query parameters for the order list endpoint.
///
/// This is deliberately narrower than [`OrderQueryFilter`]: callers choose statuses, a date window and a page, while
/// the customer and artisan scoping fields are off the wire entirely. The engine pins those to the caller's own
/// identity, so there is nothing a crafted query string can widen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListOrdersQuery {
    /// Comma-separated list of order statuses, e.g. `status=pending,paid`.
    pub status: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ListOrdersQuery {
    pub fn into_filter(self) -> Result<OrderQueryFilter, ServerError> {
        let mut filter = OrderQueryFilter::default();
        if let Some(statuses) = self.status.as_deref() {
            for word in statuses.split(',').map(str::trim).filter(|w| !w.is_empty()) {
                let status = word
                    .parse::<OrderStatus>()
                    .map_err(|_| ServerError::InvalidRequestQuery(format!("{word} is not an order status")))?;
                filter = filter.with_status(status);
            }
        }
        filter.since = self.since;
        filter.until = self.until;
        if let Some(page) = self.page {
            filter = filter.with_page(page);
        }
        if let Some(limit) = self.limit {
            filter = filter.with_limit(limit);
        }
        Ok(filter)
    }
}
