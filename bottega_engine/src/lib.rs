//! Bottega Market Engine
//!
//! The Bottega market engine is the backend for a handmade-goods marketplace, where artisans list their work and
//! customers order it. This library contains the core logic for order placement, the order status lifecycle, and
//! payment recording. It is provider-agnostic.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@sqlite`]). Currently, Sqlite is the supported backend. You should never
//!    need to access the database directly. Instead, use the public API provided by the engine. The exception is the
//!    data types used in the database. These are defined in the `db_types` module and are public.
//! 2. The engine public API ([`mod@api`]). This provides the public-facing functionality of the engine. It is
//!    responsible for placing orders, walking them through their status graph, and recording payments. Specific
//!    backends (e.g. Postgres or SQLite) need to implement the traits in [`mod@traits`] in order to act as a backend
//!    for the Bottega market server.
//!
//! Pure business rules live in their own modules so they can be tested without a database: [`mod@pricing`] turns a
//! basket into a priced order, and [`mod@transitions`] is the role-aware status transition table.
pub mod api;
pub mod db_types;
pub mod pricing;
pub mod traits;
pub mod transitions;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use api::{order_flow_api::OrderFlowApi, order_objects, orders_api::OrderQueryApi};
pub use traits::{MarketplaceDatabase, OrderFlowError, OrderHistory, OrderQueryError};
