//! Reputation score types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{SCORE_MAX, SCORE_NEUTRAL};

/// Fixed-point reputation score in [0,10000] with two implied decimals.
///
/// An agent with no countable feedback sits at the neutral midpoint.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ReputationScore(u64);

impl ReputationScore {
    /// Score assigned when no countable feedback exists.
    pub const NEUTRAL: ReputationScore = ReputationScore(SCORE_NEUTRAL);

    /// Create a new score, clamping to [0,10000].
    pub fn new(value: u64) -> Self {
        Self(value.min(SCORE_MAX))
    }

    /// Get the raw fixed-point value.
    pub fn value(self) -> u64 {
        self.0
    }

    /// Score as a percentage with two decimals.
    pub fn as_percent(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for ReputationScore {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl fmt::Display for ReputationScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.as_percent())
    }
}

impl From<ReputationScore> for u64 {
    fn from(score: ReputationScore) -> Self {
        score.0
    }
}

/// Result of a score recomputation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// The stored score.
    pub score: ReputationScore,
    /// Number of feedback entries the rescan considered.
    pub considered: u64,
}
