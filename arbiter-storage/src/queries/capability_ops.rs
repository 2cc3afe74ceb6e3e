//! Raw SQL operations for the capability table.

use rusqlite::{params, Connection};
use tracing::debug;

use arbiter_core::errors::ArbiterResult;

use crate::to_storage_err;

/// Record a role grant. Granting an already-held role is a no-op.
pub fn insert_grant(
    conn: &Connection,
    role: &str,
    principal: &str,
    granted_by: &str,
    granted_at: &str,
) -> ArbiterResult<()> {
    debug!(role, principal, granted_by, "inserting capability grant");
    conn.execute(
        "INSERT OR IGNORE INTO capability_grants (role, principal, granted_by, granted_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![role, principal, granted_by, granted_at],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Remove a role grant.
pub fn delete_grant(conn: &Connection, role: &str, principal: &str) -> ArbiterResult<()> {
    debug!(role, principal, "deleting capability grant");
    conn.execute(
        "DELETE FROM capability_grants WHERE role = ?1 AND principal = ?2",
        params![role, principal],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Whether a principal holds a role.
pub fn has_grant(conn: &Connection, role: &str, principal: &str) -> ArbiterResult<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM capability_grants WHERE role = ?1 AND principal = ?2)",
        params![role, principal],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n != 0)
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Principals holding a role.
pub fn list_grants(conn: &Connection, role: &str) -> ArbiterResult<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT principal FROM capability_grants WHERE role = ?1 ORDER BY principal")
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![role], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(|e| to_storage_err(e.to_string()))?);
    }
    Ok(results)
}

/// Number of principals holding a role.
pub fn grant_count(conn: &Connection, role: &str) -> ArbiterResult<u64> {
    conn.query_row(
        "SELECT COUNT(*) FROM capability_grants WHERE role = ?1",
        params![role],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n as u64)
    .map_err(|e| to_storage_err(e.to_string()))
}
