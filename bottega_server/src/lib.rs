//! # Bottega market server
//! This module hosts the HTTP server for the Bottega marketplace. It is responsible for:
//! Accepting order, status and payment requests from the storefront.
//! Establishing who is asking, from the identity headers installed by the fronting proxy.
//! Handing the requests to the market engine and translating its answers into HTTP responses.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/orders`: Placing orders and listing the orders the caller may see.
//! * `/api/orders/{id}`: Fetching a single order, and `/api/orders/{id}/status` for moving it along its lifecycle.
//! * `/api/payments`: Recording payments, and `/api/payments/order/{order_id}` for looking one up.

pub mod auth;
pub mod config;
pub mod data_objects;
pub mod errors;

pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
