//! Engine notifications persisted to the append-only event log.
//!
//! Every mutating operation appends its notifications inside the same
//! transaction as the mutation, so the log never disagrees with ledger
//! state. Each variant carries enough data for an external indexer to
//! reconstruct state without replaying SQL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::feedback::{FeedbackId, FeedbackType};
use super::principal::{AgentId, Principal};

/// A notification emitted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A feedback entry was recorded.
    FeedbackPosted {
        id: FeedbackId,
        agent_id: AgentId,
        reviewer: Principal,
        feedback_type: FeedbackType,
        rating: u8,
        context_hash: String,
    },
    /// A feedback entry was contested.
    FeedbackDisputed {
        id: FeedbackId,
        disputer: Principal,
        reason: String,
    },
    /// A dispute was arbitrated.
    DisputeResolved {
        id: FeedbackId,
        removed: bool,
        slashed: bool,
        resolver: Principal,
    },
    /// An agent's cached score was recomputed.
    ReputationUpdated {
        agent_id: AgentId,
        new_score: u64,
        feedback_count: u64,
    },
}

impl EngineEvent {
    /// Stable type tag used for the event log's type column.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineEvent::FeedbackPosted { .. } => "feedback_posted",
            EngineEvent::FeedbackDisputed { .. } => "feedback_disputed",
            EngineEvent::DisputeResolved { .. } => "dispute_resolved",
            EngineEvent::ReputationUpdated { .. } => "reputation_updated",
        }
    }

    /// Feedback entry this event concerns, if any.
    pub fn feedback_id(&self) -> Option<FeedbackId> {
        match self {
            EngineEvent::FeedbackPosted { id, .. }
            | EngineEvent::FeedbackDisputed { id, .. }
            | EngineEvent::DisputeResolved { id, .. } => Some(*id),
            EngineEvent::ReputationUpdated { .. } => None,
        }
    }

    /// Agent this event concerns, if any.
    pub fn agent_id(&self) -> Option<&AgentId> {
        match self {
            EngineEvent::FeedbackPosted { agent_id, .. }
            | EngineEvent::ReputationUpdated { agent_id, .. } => Some(agent_id),
            EngineEvent::FeedbackDisputed { .. } | EngineEvent::DisputeResolved { .. } => None,
        }
    }
}

/// A persisted event with its log position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the append-only log, assigned in commit order.
    pub seq: u64,
    pub event: EngineEvent,
    pub recorded_at: DateTime<Utc>,
}
