//! Raw SQL operations for stake escrow rows.

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use arbiter_core::errors::ArbiterResult;

use crate::to_storage_err;

/// An escrow row as stored.
#[derive(Debug, Clone)]
pub struct EscrowRow {
    pub feedback_id: u64,
    pub reviewer: String,
    pub amount: u64,
    pub held_at: String,
    pub released_at: Option<String>,
    pub recipient: Option<String>,
}

/// Record custody of a stake for a feedback entry.
pub fn insert_escrow(
    conn: &Connection,
    feedback_id: u64,
    reviewer: &str,
    amount: u64,
    held_at: &str,
) -> ArbiterResult<()> {
    debug!(feedback_id, amount, "inserting escrow");
    conn.execute(
        "INSERT INTO stake_escrow (feedback_id, reviewer, amount, held_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![feedback_id as i64, reviewer, amount as i64, held_at],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Get the escrow row for a feedback entry.
pub fn get_escrow(conn: &Connection, feedback_id: u64) -> ArbiterResult<Option<EscrowRow>> {
    conn.query_row(
        "SELECT feedback_id, reviewer, amount, held_at, released_at, recipient
         FROM stake_escrow WHERE feedback_id = ?1",
        params![feedback_id as i64],
        |row| {
            Ok(EscrowRow {
                feedback_id: row.get::<_, i64>(0)? as u64,
                reviewer: row.get(1)?,
                amount: row.get::<_, i64>(2)? as u64,
                held_at: row.get(3)?,
                released_at: row.get(4)?,
                recipient: row.get(5)?,
            })
        },
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Mark an escrow released to a recipient.
pub fn mark_released(
    conn: &Connection,
    feedback_id: u64,
    recipient: &str,
    released_at: &str,
) -> ArbiterResult<()> {
    debug!(feedback_id, recipient, "marking escrow released");
    conn.execute(
        "UPDATE stake_escrow SET released_at = ?2, recipient = ?3 WHERE feedback_id = ?1",
        params![feedback_id as i64, released_at, recipient],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Total value currently held in custody.
pub fn escrowed_total(conn: &Connection) -> ArbiterResult<u64> {
    conn.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM stake_escrow WHERE released_at IS NULL",
        [],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n as u64)
    .map_err(|e| to_storage_err(e.to_string()))
}
