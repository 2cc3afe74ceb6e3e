//! Raw SQL operations for cached agent scores.

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use arbiter_core::errors::ArbiterResult;

use crate::to_storage_err;

/// A cached score row.
#[derive(Debug, Clone)]
pub struct ScoreRow {
    pub score: u64,
    pub feedback_count: u64,
    pub updated_at: String,
}

/// Upsert an agent's cached score.
pub fn upsert_score(
    conn: &Connection,
    agent_id: &str,
    score: u64,
    feedback_count: u64,
    updated_at: &str,
) -> ArbiterResult<()> {
    debug!(agent_id, score, feedback_count, "upserting score");
    conn.execute(
        "INSERT INTO agent_scores (agent_id, score, feedback_count, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(agent_id) DO UPDATE SET
            score = excluded.score,
            feedback_count = excluded.feedback_count,
            updated_at = excluded.updated_at",
        params![agent_id, score as i64, feedback_count as i64, updated_at],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Get an agent's cached score row.
pub fn get_score(conn: &Connection, agent_id: &str) -> ArbiterResult<Option<ScoreRow>> {
    conn.query_row(
        "SELECT score, feedback_count, updated_at FROM agent_scores WHERE agent_id = ?1",
        params![agent_id],
        |row| {
            Ok(ScoreRow {
                score: row.get::<_, i64>(0)? as u64,
                feedback_count: row.get::<_, i64>(1)? as u64,
                updated_at: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Number of agents with a cached score.
pub fn scored_agent_count(conn: &Connection) -> ArbiterResult<u64> {
    conn.query_row("SELECT COUNT(*) FROM agent_scores", [], |row| {
        row.get::<_, i64>(0)
    })
    .map(|n| n as u64)
    .map_err(|e| to_storage_err(e.to_string()))
}
