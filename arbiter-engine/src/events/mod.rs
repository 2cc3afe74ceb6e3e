//! Append-only engine event log.
//!
//! Every mutating operation appends its notifications in the same
//! transaction as the mutation, so the log never disagrees with ledger
//! state. External indexers can reconstruct state from the log alone.

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use arbiter_core::errors::{ArbiterError, ArbiterResult, StorageError};
use arbiter_core::models::events::{EngineEvent, EventRecord};
use arbiter_core::models::feedback::{Feedback, FeedbackId};
use arbiter_core::models::principal::{AgentId, Principal};
use arbiter_core::models::reputation::ReputationScore;

use arbiter_storage::queries::event_ops;

/// Appends engine events and reads them back.
pub struct EventLogger;

impl EventLogger {
    /// Append an event; returns its log position.
    pub fn append(conn: &Connection, event: &EngineEvent, at: DateTime<Utc>) -> ArbiterResult<u64> {
        let payload = serde_json::to_string(event)
            .map_err(|e| ArbiterError::Encoding(format!("failed to serialize event: {e}")))?;
        event_ops::insert_event(
            conn,
            event.kind(),
            event.feedback_id().map(|id| id.0),
            event.agent_id().map(|a| a.as_str()),
            &payload,
            &at.to_rfc3339(),
        )
    }

    /// Record that a feedback entry was posted.
    pub fn feedback_posted(conn: &Connection, feedback: &Feedback) -> ArbiterResult<u64> {
        Self::append(
            conn,
            &EngineEvent::FeedbackPosted {
                id: feedback.id,
                agent_id: feedback.agent_id.clone(),
                reviewer: feedback.reviewer.clone(),
                feedback_type: feedback.feedback_type,
                rating: feedback.rating,
                context_hash: feedback.context_hash.clone(),
            },
            feedback.posted_at,
        )
    }

    /// Record that a feedback entry was contested.
    pub fn feedback_disputed(
        conn: &Connection,
        id: FeedbackId,
        disputer: &Principal,
        reason: &str,
        at: DateTime<Utc>,
    ) -> ArbiterResult<u64> {
        Self::append(
            conn,
            &EngineEvent::FeedbackDisputed {
                id,
                disputer: disputer.clone(),
                reason: reason.to_string(),
            },
            at,
        )
    }

    /// Record a dispute's outcome.
    pub fn dispute_resolved(
        conn: &Connection,
        id: FeedbackId,
        removed: bool,
        slashed: bool,
        resolver: &Principal,
        at: DateTime<Utc>,
    ) -> ArbiterResult<u64> {
        Self::append(
            conn,
            &EngineEvent::DisputeResolved {
                id,
                removed,
                slashed,
                resolver: resolver.clone(),
            },
            at,
        )
    }

    /// Record a score recomputation.
    pub fn reputation_updated(
        conn: &Connection,
        agent_id: &AgentId,
        new_score: ReputationScore,
        feedback_count: u64,
        at: DateTime<Utc>,
    ) -> ArbiterResult<u64> {
        Self::append(
            conn,
            &EngineEvent::ReputationUpdated {
                agent_id: agent_id.clone(),
                new_score: new_score.value(),
                feedback_count,
            },
            at,
        )
    }

    /// All events concerning one feedback entry, in log order.
    pub fn for_feedback(conn: &Connection, id: FeedbackId) -> ArbiterResult<Vec<EventRecord>> {
        let rows = event_ops::list_for_feedback(conn, id.0)?;
        rows.iter().map(record_from_row).collect()
    }

    /// The most recent `limit` events, oldest first.
    pub fn recent(conn: &Connection, limit: usize) -> ArbiterResult<Vec<EventRecord>> {
        let rows = event_ops::list_recent(conn, limit)?;
        rows.iter().map(record_from_row).collect()
    }
}

fn record_from_row(row: &event_ops::EventRow) -> ArbiterResult<EventRecord> {
    let event: EngineEvent = serde_json::from_str(&row.payload).map_err(|e| {
        ArbiterError::from(StorageError::CorruptRow {
            details: format!("event {} has payload {:?}: {e}", row.id, row.payload),
        })
    })?;
    let recorded_at = chrono::DateTime::parse_from_rfc3339(&row.recorded_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            ArbiterError::from(StorageError::CorruptRow {
                details: format!("event {} has timestamp {:?}: {e}", row.id, row.recorded_at),
            })
        })?;
    Ok(EventRecord {
        seq: row.id,
        event,
        recorded_at,
    })
}
