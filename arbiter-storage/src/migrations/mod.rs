//! Versioned schema migrations, applied in order at startup.

use rusqlite::Connection;

use arbiter_core::errors::{ArbiterError, ArbiterResult, StorageError};

use crate::to_storage_err;

mod v001_ledger_tables;
mod v002_capability_tables;
mod v003_event_log;

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 3;

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> ArbiterResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let current = current_version(conn)?;
    apply(conn, current, 1, v001_ledger_tables::migrate)?;
    apply(conn, current, 2, v002_capability_tables::migrate)?;
    apply(conn, current, 3, v003_event_log::migrate)?;
    Ok(())
}

/// Highest applied migration version, 0 on a fresh database.
pub fn current_version(conn: &Connection) -> ArbiterResult<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get::<_, u32>(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

fn apply(
    conn: &Connection,
    current: u32,
    version: u32,
    migrate: fn(&Connection) -> ArbiterResult<()>,
) -> ArbiterResult<()> {
    if current >= version {
        return Ok(());
    }
    migrate(conn).map_err(|e| {
        ArbiterError::from(StorageError::MigrationFailed {
            version,
            reason: e.to_string(),
        })
    })?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    tracing::info!(version, "migration applied");
    Ok(())
}
