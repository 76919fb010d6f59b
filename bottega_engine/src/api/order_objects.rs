use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Order, OrderStatus},
    traits::OrderQueryError,
};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

//--------------------------------------     OrderList        ---------------------------------------------------------
/// One page of an order search, with enough metadata for clients to paginate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderList {
    pub total_items: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub orders: Vec<Order>,
}

impl OrderList {
    pub fn new(total_items: i64, query: &OrderQueryFilter, orders: Vec<Order>) -> Self {
        let limit = query.limit();
        let total_pages = if total_items == 0 { 0 } else { (total_items + limit - 1) / limit };
        Self { total_items, total_pages, current_page: query.page(), orders }
    }
}

//--------------------------------------  OrderQueryFilter    ---------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderQueryFilter {
    /// Restrict to orders placed by this customer.
    pub customer_id: Option<i64>,
    /// Restrict to orders containing at least one item sold by this artisan.
    pub artisan_id: Option<i64>,
    pub status: Option<Vec<OrderStatus>>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl OrderQueryFilter {
    pub fn with_customer_id(mut self, customer_id: i64) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn with_artisan_id(mut self, artisan_id: i64) -> Self {
        self.artisan_id = Some(artisan_id);
        self
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status.get_or_insert_with(Vec::new).push(status);
        self
    }

    pub fn since<T>(mut self, since: T) -> Result<Self, OrderQueryError>
    where
        T: TryInto<DateTime<Utc>>,
        T::Error: Display,
    {
        let dt = since.try_into().map_err(|e| OrderQueryError::QueryError(e.to_string()))?;
        self.since = Some(dt);
        Ok(self)
    }

    pub fn until<T>(mut self, until: T) -> Result<Self, OrderQueryError>
    where
        T: TryInto<DateTime<Utc>>,
        T::Error: Display,
    {
        let dt = until.try_into().map_err(|e| OrderQueryError::QueryError(e.to_string()))?;
        self.until = Some(dt);
        Ok(self)
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The page to fetch, 1-based.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }

    pub fn is_empty(&self) -> bool {
        self.customer_id.is_none() &&
            self.artisan_id.is_none() &&
            self.status.is_none() &&
            self.since.is_none() &&
            self.until.is_none() &&
            self.page.is_none() &&
            self.limit.is_none()
    }

    /// True when the filter narrows the result set at all. Pagination alone does not count.
    pub fn has_conditions(&self) -> bool {
        self.customer_id.is_some() ||
            self.artisan_id.is_some() ||
            self.status.as_ref().is_some_and(|s| !s.is_empty()) ||
            self.since.is_some() ||
            self.until.is_some()
    }
}

impl Display for OrderQueryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "No filters.")?;
            return Ok(());
        }
        if let Some(customer_id) = self.customer_id {
            write!(f, "customer: {customer_id}. ")?;
        }
        if let Some(artisan_id) = self.artisan_id {
            write!(f, "artisan: {artisan_id}. ")?;
        }
        if let Some(statuses) = &self.status {
            let statuses = statuses.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(", ");
            write!(f, "status in [{statuses}]. ")?;
        }
        if let Some(since) = self.since {
            write!(f, "since: {since}. ")?;
        }
        if let Some(until) = self.until {
            write!(f, "until: {until}. ")?;
        }
        if let Some(page) = self.page {
            write!(f, "page: {page}. ")?;
        }
        if let Some(limit) = self.limit {
            write!(f, "limit: {limit}. ")?;
        }
        Ok(())
    }
}
