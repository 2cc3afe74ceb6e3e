//! Raw SQL operations for the feedback ledger and per-type counters.

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use arbiter_core::errors::ArbiterResult;

use crate::to_storage_err;

/// Parameters for inserting a feedback row.
pub struct InsertFeedbackParams<'a> {
    pub reviewer: &'a str,
    pub agent_id: &'a str,
    pub feedback_type: &'a str,
    pub rating: u8,
    pub context_hash: &'a str,
    pub metadata: &'a str,
    pub posted_at: &'a str,
    pub stake: u64,
}

/// A feedback row as stored.
#[derive(Debug, Clone)]
pub struct FeedbackRow {
    pub id: u64,
    pub reviewer: String,
    pub agent_id: String,
    pub feedback_type: String,
    pub rating: u8,
    pub context_hash: String,
    pub metadata: String,
    pub posted_at: String,
    pub stake: u64,
    pub disputed: bool,
    pub removed: bool,
}

fn row_to_feedback(row: &rusqlite::Row<'_>) -> rusqlite::Result<FeedbackRow> {
    Ok(FeedbackRow {
        id: row.get::<_, i64>(0)? as u64,
        reviewer: row.get(1)?,
        agent_id: row.get(2)?,
        feedback_type: row.get(3)?,
        rating: row.get::<_, i64>(4)? as u8,
        context_hash: row.get(5)?,
        metadata: row.get(6)?,
        posted_at: row.get(7)?,
        stake: row.get::<_, i64>(8)? as u64,
        disputed: row.get::<_, i64>(9)? != 0,
        removed: row.get::<_, i64>(10)? != 0,
    })
}

const FEEDBACK_COLUMNS: &str = "id, reviewer, agent_id, feedback_type, rating, \
     context_hash, metadata, posted_at, stake, disputed, removed";

/// Insert a feedback row; returns the assigned id.
pub fn insert_feedback(conn: &Connection, p: &InsertFeedbackParams<'_>) -> ArbiterResult<u64> {
    debug!(agent_id = p.agent_id, reviewer = p.reviewer, "inserting feedback");
    conn.execute(
        "INSERT INTO feedback (reviewer, agent_id, feedback_type, rating, context_hash, metadata, posted_at, stake)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            p.reviewer,
            p.agent_id,
            p.feedback_type,
            p.rating,
            p.context_hash,
            p.metadata,
            p.posted_at,
            p.stake as i64,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(conn.last_insert_rowid() as u64)
}

/// Get a feedback row by id.
pub fn get_feedback(conn: &Connection, id: u64) -> ArbiterResult<Option<FeedbackRow>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE id = ?1"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;

    stmt.query_row(params![id as i64], row_to_feedback)
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// All feedback for an agent, ordered by id.
pub fn list_by_agent(conn: &Connection, agent_id: &str) -> ArbiterResult<Vec<FeedbackRow>> {
    list_by_column(conn, "agent_id", agent_id)
}

/// All feedback submitted by a reviewer, ordered by id.
pub fn list_by_reviewer(conn: &Connection, reviewer: &str) -> ArbiterResult<Vec<FeedbackRow>> {
    list_by_column(conn, "reviewer", reviewer)
}

fn list_by_column(conn: &Connection, column: &str, value: &str) -> ArbiterResult<Vec<FeedbackRow>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE {column} = ?1 ORDER BY id"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![value], row_to_feedback)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(|e| to_storage_err(e.to_string()))?);
    }
    Ok(results)
}

/// Set or clear the disputed flag.
pub fn set_disputed(conn: &Connection, id: u64, disputed: bool) -> ArbiterResult<()> {
    debug!(id, disputed, "updating disputed flag");
    conn.execute(
        "UPDATE feedback SET disputed = ?2 WHERE id = ?1",
        params![id as i64, disputed as i64],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Soft-remove an entry: zero the rating, clear the dispute flag, mark removed.
pub fn mark_removed(conn: &Connection, id: u64) -> ArbiterResult<()> {
    debug!(id, "marking feedback removed");
    conn.execute(
        "UPDATE feedback SET rating = 0, disputed = 0, removed = 1 WHERE id = ?1",
        params![id as i64],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Zero the stake column after release.
pub fn zero_stake(conn: &Connection, id: u64) -> ArbiterResult<()> {
    debug!(id, "zeroing stake");
    conn.execute(
        "UPDATE feedback SET stake = 0 WHERE id = ?1",
        params![id as i64],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Increment the per-agent counter for a feedback type.
pub fn increment_count(conn: &Connection, agent_id: &str, feedback_type: &str) -> ArbiterResult<()> {
    conn.execute(
        "INSERT INTO feedback_counts (agent_id, feedback_type, count) VALUES (?1, ?2, 1)
         ON CONFLICT(agent_id, feedback_type) DO UPDATE SET count = count + 1",
        params![agent_id, feedback_type],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Decrement the per-agent counter for a feedback type, floored at zero.
pub fn decrement_count(conn: &Connection, agent_id: &str, feedback_type: &str) -> ArbiterResult<()> {
    conn.execute(
        "UPDATE feedback_counts SET count = MAX(count - 1, 0)
         WHERE agent_id = ?1 AND feedback_type = ?2",
        params![agent_id, feedback_type],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Current counter value for an agent/type pair.
pub fn get_count(conn: &Connection, agent_id: &str, feedback_type: &str) -> ArbiterResult<u64> {
    conn.query_row(
        "SELECT COALESCE(
            (SELECT count FROM feedback_counts WHERE agent_id = ?1 AND feedback_type = ?2), 0)",
        params![agent_id, feedback_type],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n as u64)
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Total number of feedback entries in the ledger.
pub fn total_count(conn: &Connection) -> ArbiterResult<u64> {
    conn.query_row("SELECT COUNT(*) FROM feedback", [], |row| {
        row.get::<_, i64>(0)
    })
    .map(|n| n as u64)
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Number of entries currently under dispute.
pub fn disputed_count(conn: &Connection) -> ArbiterResult<u64> {
    conn.query_row("SELECT COUNT(*) FROM feedback WHERE disputed = 1", [], |row| {
        row.get::<_, i64>(0)
    })
    .map(|n| n as u64)
    .map_err(|e| to_storage_err(e.to_string()))
}
