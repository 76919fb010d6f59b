//! # Bottega market engine public API
//!
//! The `api` module exposes the programmatic API for the Bottega market engine.
//! The API is modular, so that clients of the API can pick and choose the functionality they want.
//! Or different parts (e.g. order flow and order history) could be configured on different machines, or even use
//! Sqlite for one and Postgres for the other.
//!
//! * [`order_flow_api`] is the primary API for the order lifecycle: placing orders, moving them through their
//!   status graph, and recording payments against them.
//! * [`orders_api`] provides read access to orders and payments, scoped to what the caller is allowed to see.
//!
//! The other submodules in this module are support and utility functions and types.
//!
//! # API usage
//!
//! The pattern for using all the APIs is the same. An API instance is created by supplying a database backend that
//! implements the specific backend traits required by the API.
//!
//! For example, to create an API instance to query the orders on the database:
//!
//! ```rust,ignore
//! use bottega_engine::{OrderQueryApi, SqliteDatabase};
//! use bottega_engine::db_types::{Role, UserIdentity};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! // SqliteDatabase implements OrderHistory
//! let api = OrderQueryApi::new(db);
//! // use the api to access information
//! let admin = UserIdentity::new(1, Role::Admin);
//! let order = api.fetch_order(&admin, 42).await?;
//! ```

pub mod order_flow_api;
pub mod order_objects;
pub mod orders_api;
