//! Raw SQL operations for the append-only event log.

use rusqlite::{params, Connection};

use arbiter_core::errors::ArbiterResult;

use crate::to_storage_err;

/// A persisted event row.
#[derive(Debug, Clone)]
pub struct EventRow {
    pub id: u64,
    pub event_type: String,
    pub feedback_id: Option<u64>,
    pub agent_id: Option<String>,
    pub payload: String,
    pub recorded_at: String,
}

fn row_to_event(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get::<_, i64>(0)? as u64,
        event_type: row.get(1)?,
        feedback_id: row.get::<_, Option<i64>>(2)?.map(|n| n as u64),
        agent_id: row.get(3)?,
        payload: row.get(4)?,
        recorded_at: row.get(5)?,
    })
}

/// Append an event; returns its log position.
pub fn insert_event(
    conn: &Connection,
    event_type: &str,
    feedback_id: Option<u64>,
    agent_id: Option<&str>,
    payload: &str,
    recorded_at: &str,
) -> ArbiterResult<u64> {
    conn.execute(
        "INSERT INTO event_log (event_type, feedback_id, agent_id, payload, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            event_type,
            feedback_id.map(|n| n as i64),
            agent_id,
            payload,
            recorded_at,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(conn.last_insert_rowid() as u64)
}

/// Events concerning a feedback entry, in log order.
pub fn list_for_feedback(conn: &Connection, feedback_id: u64) -> ArbiterResult<Vec<EventRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, event_type, feedback_id, agent_id, payload, recorded_at
             FROM event_log WHERE feedback_id = ?1 ORDER BY id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![feedback_id as i64], row_to_event)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(|e| to_storage_err(e.to_string()))?);
    }
    Ok(results)
}

/// The most recent `limit` events, newest last.
pub fn list_recent(conn: &Connection, limit: usize) -> ArbiterResult<Vec<EventRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, event_type, feedback_id, agent_id, payload, recorded_at
             FROM (SELECT * FROM event_log ORDER BY id DESC LIMIT ?1) ORDER BY id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![limit as i64], row_to_event)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(|e| to_storage_err(e.to_string()))?);
    }
    Ok(results)
}
