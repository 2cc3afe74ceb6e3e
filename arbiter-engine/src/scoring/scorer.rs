//! ReputationScorer — full-rescan recompute of an agent's cached score.
//!
//! Every mutating operation that changes countable feedback rescans the
//! agent's complete history rather than maintaining incremental sums. The
//! rescan keeps the floor-division rounding of the recency term exactly
//! reproducible regardless of when entries were posted.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::{debug, instrument};

use arbiter_core::constants::SCORE_NEUTRAL;
use arbiter_core::errors::{ArbiterResult, StorageError};
use arbiter_core::models::feedback::FeedbackType;
use arbiter_core::models::principal::AgentId;
use arbiter_core::models::reputation::{ReputationScore, ScoreSummary};

use arbiter_storage::queries::{feedback_ops, score_ops};

use crate::events::EventLogger;

use super::weights;

/// Recomputes and caches per-agent reputation scores.
pub struct ReputationScorer;

impl ReputationScorer {
    /// Rescan the agent's full feedback history and store the new score.
    ///
    /// Disputed entries and entries whose rating is zero are skipped. With
    /// no eligible entries the agent sits at the neutral score. Appends a
    /// `ReputationUpdated` event and returns the stored summary.
    #[instrument(skip(conn))]
    pub fn recompute(
        conn: &Connection,
        agent_id: &AgentId,
        now: DateTime<Utc>,
    ) -> ArbiterResult<ScoreSummary> {
        let rows = feedback_ops::list_by_agent(conn, agent_id.as_str())?;

        let mut weighted_sum: u64 = 0;
        let mut weight_total: u64 = 0;
        let mut considered: u64 = 0;

        for row in &rows {
            if row.disputed || row.rating == 0 {
                continue;
            }
            let feedback_type = FeedbackType::parse(&row.feedback_type).ok_or_else(|| {
                StorageError::CorruptRow {
                    details: format!("feedback {} has type {:?}", row.id, row.feedback_type),
                }
            })?;
            let posted_at = parse_timestamp(row.id, &row.posted_at)?;

            let weight = weights::time_weight(posted_at, now) * weights::stake_weight(row.stake);
            weighted_sum += weights::entry_score(feedback_type, row.rating) * weight;
            weight_total += weight;
            considered += 1;
        }

        let raw = if weight_total == 0 {
            SCORE_NEUTRAL
        } else {
            weighted_sum / weight_total
        };
        let score = ReputationScore::new(raw);

        score_ops::upsert_score(
            conn,
            agent_id.as_str(),
            score.value(),
            considered,
            &now.to_rfc3339(),
        )?;
        EventLogger::reputation_updated(conn, agent_id, score, considered, now)?;

        debug!(
            agent_id = %agent_id,
            score = score.value(),
            considered,
            "reputation recomputed"
        );
        Ok(ScoreSummary { score, considered })
    }

    /// Cached score for an agent; neutral when never scored.
    pub fn cached(conn: &Connection, agent_id: &AgentId) -> ArbiterResult<ScoreSummary> {
        match score_ops::get_score(conn, agent_id.as_str())? {
            Some(row) => Ok(ScoreSummary {
                score: ReputationScore::new(row.score),
                considered: row.feedback_count,
            }),
            None => Ok(ScoreSummary {
                score: ReputationScore::NEUTRAL,
                considered: 0,
            }),
        }
    }
}

fn parse_timestamp(id: u64, text: &str) -> ArbiterResult<DateTime<Utc>> {
    chrono::DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            StorageError::CorruptRow {
                details: format!("feedback {id} has timestamp {text:?}: {e}"),
            }
            .into()
        })
}
