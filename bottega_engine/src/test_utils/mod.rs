//! Helpers for setting up test databases and seeding them with users and products.

pub mod helpers;
pub mod prepare_env;
