//! SQLite-backed implementation of the license store.

use crate::error::{StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use stockwise_license::{LicenseError, LicenseRecord, LicenseResult, LicenseStore};
use tracing::debug;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS licenses (
    license_key TEXT PRIMARY KEY,
    record      TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS system_settings (
    setting_key   TEXT PRIMARY KEY,
    setting_value TEXT NOT NULL,
    updated_at    TEXT NOT NULL DEFAULT (datetime('now'))
);
";

/// License and settings storage over a single SQLite connection.
///
/// Records are stored as JSON blobs mirroring their wire shape, so schema
/// migrations only matter for lookup columns.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the schema cannot
    /// be created.
    pub fn open(path: &Path) -> StoreResult<Self> {
        debug!("opening license store at {}", path.display());
        Self::init(Connection::open(path)?)
    }

    /// Opens a fresh in-memory database, for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Lock)
    }

    fn fetch_license(&self, license_key: &str) -> StoreResult<Option<LicenseRecord>> {
        let conn = self.conn()?;
        let json: Option<String> = conn
            .query_row(
                "SELECT record FROM licenses WHERE license_key = ?1",
                params![license_key],
                |row| row.get(0),
            )
            .optional()?;
        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save_license(&self, record: &LicenseRecord) -> StoreResult<()> {
        let json = serde_json::to_string(record)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO licenses (license_key, record) VALUES (?1, ?2)",
            params![record.license_key, json],
        )?;
        Ok(())
    }

    fn fetch_setting(&self, setting_key: &str) -> StoreResult<Option<String>> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT setting_value FROM system_settings WHERE setting_key = ?1",
                params![setting_key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save_setting(&self, setting_key: &str, value: &str) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO system_settings (setting_key, setting_value, updated_at)
             VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(setting_key) DO UPDATE SET
                 setting_value = excluded.setting_value,
                 updated_at = excluded.updated_at",
            params![setting_key, value],
        )?;
        Ok(())
    }

    fn remove_setting(&self, setting_key: &str) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM system_settings WHERE setting_key = ?1",
            params![setting_key],
        )?;
        Ok(())
    }
}

fn store_err(e: StoreError) -> LicenseError {
    LicenseError::Store(e.to_string())
}

impl LicenseStore for SqliteStore {
    fn get_license(&self, license_key: &str) -> LicenseResult<Option<LicenseRecord>> {
        self.fetch_license(license_key).map_err(store_err)
    }

    fn put_license(&self, record: &LicenseRecord) -> LicenseResult<()> {
        self.save_license(record).map_err(store_err)
    }

    fn get_setting(&self, setting_key: &str) -> LicenseResult<Option<String>> {
        self.fetch_setting(setting_key).map_err(store_err)
    }

    fn put_setting(&self, setting_key: &str, value: &str) -> LicenseResult<()> {
        self.save_setting(setting_key, value).map_err(store_err)
    }

    fn delete_setting(&self, setting_key: &str) -> LicenseResult<()> {
        self.remove_setting(setting_key).map_err(store_err)
    }
}
