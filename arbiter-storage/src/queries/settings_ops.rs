//! Raw SQL operations for persisted engine settings.

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use arbiter_core::errors::ArbiterResult;

use crate::to_storage_err;

/// Set a setting, replacing any previous value.
pub fn set_setting(conn: &Connection, key: &str, value: &str) -> ArbiterResult<()> {
    debug!(key, value, "setting engine setting");
    conn.execute(
        "INSERT INTO engine_settings (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Get a setting's value.
pub fn get_setting(conn: &Connection, key: &str) -> ArbiterResult<Option<String>> {
    conn.query_row(
        "SELECT value FROM engine_settings WHERE key = ?1",
        params![key],
        |row| row.get::<_, String>(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}
