//! Pure reads over the feedback ledger.

use chrono::Utc;
use rusqlite::Connection;

use arbiter_core::errors::{ArbiterError, ArbiterResult, LedgerError, StorageError};
use arbiter_core::models::feedback::{Feedback, FeedbackId, FeedbackType};
use arbiter_core::models::principal::{AgentId, Principal};

use arbiter_storage::queries::feedback_ops;

/// Get a feedback entry by id; fails `NotFound` for an id never created.
pub fn get(conn: &Connection, id: FeedbackId) -> ArbiterResult<Feedback> {
    match feedback_ops::get_feedback(conn, id.0)? {
        Some(row) => feedback_from_row(&row),
        None => Err(LedgerError::NotFound(id.0).into()),
    }
}

/// All feedback for an agent, ordered by id.
pub fn by_agent(conn: &Connection, agent_id: &AgentId) -> ArbiterResult<Vec<Feedback>> {
    let rows = feedback_ops::list_by_agent(conn, agent_id.as_str())?;
    rows.iter().map(feedback_from_row).collect()
}

/// All feedback submitted by a reviewer, ordered by id.
pub fn by_reviewer(conn: &Connection, reviewer: &Principal) -> ArbiterResult<Vec<Feedback>> {
    let rows = feedback_ops::list_by_reviewer(conn, reviewer.as_str())?;
    rows.iter().map(feedback_from_row).collect()
}

/// Running total for an agent/type pair.
pub fn count_by_type(
    conn: &Connection,
    agent_id: &AgentId,
    feedback_type: FeedbackType,
) -> ArbiterResult<u64> {
    feedback_ops::get_count(conn, agent_id.as_str(), feedback_type.as_str())
}

/// Convert a storage row to a `Feedback`.
pub(crate) fn feedback_from_row(row: &feedback_ops::FeedbackRow) -> ArbiterResult<Feedback> {
    let feedback_type = FeedbackType::parse(&row.feedback_type).ok_or_else(|| {
        ArbiterError::from(StorageError::CorruptRow {
            details: format!("feedback {} has type {:?}", row.id, row.feedback_type),
        })
    })?;
    let posted_at = chrono::DateTime::parse_from_rfc3339(&row.posted_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            ArbiterError::from(StorageError::CorruptRow {
                details: format!("feedback {} has timestamp {:?}: {e}", row.id, row.posted_at),
            })
        })?;

    Ok(Feedback {
        id: FeedbackId(row.id),
        reviewer: Principal::from(row.reviewer.as_str()),
        agent_id: AgentId::from(row.agent_id.as_str()),
        feedback_type,
        rating: row.rating,
        context_hash: row.context_hash.clone(),
        metadata: row.metadata.clone(),
        posted_at,
        stake: row.stake,
        disputed: row.disputed,
        removed: row.removed,
    })
}
