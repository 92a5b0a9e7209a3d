//! # storage-adapters
//!
//! SQLite implementation of the `domains` repository ports.

mod schema;
mod sqlite;

pub use sqlite::SqliteStore;
