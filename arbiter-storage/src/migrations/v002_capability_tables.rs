//! v002: Capability grants and persisted engine settings.

use rusqlite::Connection;

use arbiter_core::errors::ArbiterResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> ArbiterResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS capability_grants (
            role       TEXT NOT NULL,
            principal  TEXT NOT NULL,
            granted_by TEXT NOT NULL,
            granted_at TEXT NOT NULL,
            PRIMARY KEY (role, principal)
        );

        CREATE INDEX IF NOT EXISTS idx_grants_principal ON capability_grants(principal);

        -- Admin-mutable settings that must survive reopen (minimum stake).
        CREATE TABLE IF NOT EXISTS engine_settings (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
