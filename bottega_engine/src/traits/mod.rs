//! # Storage backend contracts.
//!
//! This module provides the interfaces that define the contracts of the marketplace engine database *backends*.
//!
//! ## Order flow
//! The [`MarketplaceDatabase`] trait carries the mutating order flow: placing orders, moving them through the status
//! state machine, and recording payments against them. Every one of these operations is a single atomic transaction;
//! a failure anywhere inside leaves the store exactly as it was.
//!
//! The [`OrderHistory`] trait provides the read side: fetching a single order with its items, running filtered and
//! paginated order searches, and looking up the payment recorded against an order. Visibility rules (who may see
//! which order) are applied by the API layer on top of these queries.
mod marketplace_database;
mod order_history;

pub use marketplace_database::{MarketplaceDatabase, OrderFlowError};
pub use order_history::{OrderHistory, OrderQueryError};
