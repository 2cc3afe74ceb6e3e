//! Feedback records and their classification.
//!
//! # Examples
//!
//! ```
//! use arbiter_core::models::feedback::{Feedback, FeedbackId, FeedbackType};
//! use arbiter_core::models::principal::{AgentId, Principal};
//! use chrono::Utc;
//!
//! let feedback = Feedback {
//!     id: FeedbackId(1),
//!     reviewer: Principal::from("reviewer-a"),
//!     agent_id: AgentId::from("agent-b"),
//!     feedback_type: FeedbackType::Positive,
//!     rating: 90,
//!     context_hash: String::new(),
//!     metadata: String::new(),
//!     posted_at: Utc::now(),
//!     stake: 0,
//!     disputed: false,
//!     removed: false,
//! };
//! assert!(feedback.is_scorable());
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::principal::{AgentId, Principal};

/// Monotonically increasing feedback identifier, assigned by the ledger
/// starting at 1. Two concurrent posts are totally ordered by commit order;
/// an id is never double-assigned.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct FeedbackId(pub u64);

impl fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classification of a feedback entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackType {
    Positive,
    Negative,
    Neutral,
    Dispute,
}

impl FeedbackType {
    /// Stable identifier used for storage and counters.
    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackType::Positive => "positive",
            FeedbackType::Negative => "negative",
            FeedbackType::Neutral => "neutral",
            FeedbackType::Dispute => "dispute",
        }
    }

    /// Parse a stored type identifier.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "positive" => Some(FeedbackType::Positive),
            "negative" => Some(FeedbackType::Negative),
            "neutral" => Some(FeedbackType::Neutral),
            "dispute" => Some(FeedbackType::Dispute),
            _ => None,
        }
    }
}

impl fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reviewer's rated opinion about one agent, optionally backed by stake.
///
/// Identity fields (`id`, `reviewer`, `agent_id`, `posted_at`) are fixed at
/// creation. `rating`, `stake`, `disputed`, and `removed` change only through
/// dispute resolution. Removal is a soft mark — the record is retained
/// forever, so historical queries by id stay valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: FeedbackId,
    /// Principal that submitted the entry.
    pub reviewer: Principal,
    /// Agent the entry rates. Must reference an active agent at creation.
    pub agent_id: AgentId,
    pub feedback_type: FeedbackType,
    /// Rating in [0,100]. Zeroed by a removal-resolution.
    pub rating: u8,
    /// Opaque reference to the interaction context; not interpreted here.
    pub context_hash: String,
    /// Opaque metadata blob; not interpreted here.
    pub metadata: String,
    /// Creation time, never updated.
    pub posted_at: DateTime<Utc>,
    /// Escrowed amount; 0 when unstaked or after release.
    pub stake: u64,
    /// True only between a dispute and its matching resolution.
    pub disputed: bool,
    /// Set by a removal-resolution. Distinguishes a zeroed rating from an
    /// original rating of 0.
    pub removed: bool,
}

impl Feedback {
    /// Whether this entry counts toward the reputation score.
    pub fn is_scorable(&self) -> bool {
        !self.disputed && self.rating > 0
    }
}
