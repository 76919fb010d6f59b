//! SQLite database module for the Bottega market engine.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
