//! SQLite storage for the StockWise license subsystem.
//!
//! Backs the two logical tables the license core needs: `licenses`
//! (records stored as JSON blobs keyed by license key) and
//! `system_settings` (singleton key/value rows). Schema creation is
//! idempotent and runs on every open.

mod error;
mod sqlite;

pub use error::{StoreError, StoreResult};
pub use sqlite::SqliteStore;
