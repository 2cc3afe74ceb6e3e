//! Feedback ingestion — validation, insertion, counters, scoring, events.
//!
//! Validation runs before any mutation; everything after the first insert
//! happens inside the caller's transaction, so a failure at any step leaves
//! no partial record observable.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::{debug, instrument};

use arbiter_core::constants::{DEFAULT_MINIMUM_STAKE, RATING_MAX};
use arbiter_core::errors::{ArbiterResult, LedgerError};
use arbiter_core::models::feedback::{FeedbackId, FeedbackType};
use arbiter_core::models::principal::{AgentId, Principal};
use arbiter_core::traits::{IIdentityDirectory, IValueTransfer};

use arbiter_storage::queries::{feedback_ops, settings_ops};

use crate::events::EventLogger;
use crate::scoring::ReputationScorer;
use crate::vault::StakeVault;

/// Key of the persisted minimum-stake setting.
pub const MIN_STAKE_KEY: &str = "minimum_stake";

/// A feedback entry to be posted.
#[derive(Debug)]
pub struct NewFeedback<'a> {
    pub reviewer: &'a Principal,
    pub agent_id: &'a AgentId,
    pub feedback_type: FeedbackType,
    pub rating: u8,
    pub context_hash: &'a str,
    pub metadata: &'a str,
}

/// Ingests feedback entries.
pub struct FeedbackLedger;

impl FeedbackLedger {
    /// Post an unstaked feedback entry; returns the assigned id.
    #[instrument(skip(conn, directory))]
    pub fn post(
        conn: &Connection,
        directory: &dyn IIdentityDirectory,
        entry: &NewFeedback<'_>,
        now: DateTime<Utc>,
    ) -> ArbiterResult<FeedbackId> {
        Self::validate(directory, entry)?;
        Self::commit_entry(conn, entry, 0, None, now)
    }

    /// Post a feedback entry backed by `stake`, which moves into vault
    /// custody. Fails when the stake is below the current minimum.
    #[instrument(skip(conn, directory, book))]
    pub fn post_staked(
        conn: &Connection,
        directory: &dyn IIdentityDirectory,
        book: &dyn IValueTransfer,
        entry: &NewFeedback<'_>,
        stake: u64,
        now: DateTime<Utc>,
    ) -> ArbiterResult<FeedbackId> {
        Self::validate(directory, entry)?;
        let minimum = minimum_stake(conn)?;
        if stake < minimum {
            return Err(LedgerError::InsufficientStake {
                provided: stake,
                minimum,
            }
            .into());
        }
        Self::commit_entry(conn, entry, stake, Some(book), now)
    }

    fn validate(directory: &dyn IIdentityDirectory, entry: &NewFeedback<'_>) -> ArbiterResult<()> {
        if entry.rating > RATING_MAX {
            return Err(LedgerError::InvalidRating {
                rating: entry.rating,
            }
            .into());
        }
        if !directory.is_agent_active(entry.agent_id)? {
            return Err(LedgerError::UnknownOrInactiveAgent(entry.agent_id.to_string()).into());
        }
        Ok(())
    }

    fn commit_entry(
        conn: &Connection,
        entry: &NewFeedback<'_>,
        stake: u64,
        book: Option<&dyn IValueTransfer>,
        now: DateTime<Utc>,
    ) -> ArbiterResult<FeedbackId> {
        let id = feedback_ops::insert_feedback(
            conn,
            &feedback_ops::InsertFeedbackParams {
                reviewer: entry.reviewer.as_str(),
                agent_id: entry.agent_id.as_str(),
                feedback_type: entry.feedback_type.as_str(),
                rating: entry.rating,
                context_hash: entry.context_hash,
                metadata: entry.metadata,
                posted_at: &now.to_rfc3339(),
                stake,
            },
        )?;
        let id = FeedbackId(id);

        if let Some(book) = book {
            StakeVault::hold(conn, book, id, entry.reviewer, stake, now)?;
        }

        feedback_ops::increment_count(
            conn,
            entry.agent_id.as_str(),
            entry.feedback_type.as_str(),
        )?;

        let feedback = super::reads::get(conn, id)?;
        EventLogger::feedback_posted(conn, &feedback)?;
        ReputationScorer::recompute(conn, entry.agent_id, now)?;

        debug!(id = %id, agent_id = %entry.agent_id, stake, "feedback posted");
        Ok(id)
    }
}

/// Current minimum stake for staked posts.
pub fn minimum_stake(conn: &Connection) -> ArbiterResult<u64> {
    match settings_ops::get_setting(conn, MIN_STAKE_KEY)? {
        Some(value) => Ok(value.parse().unwrap_or(DEFAULT_MINIMUM_STAKE)),
        None => Ok(DEFAULT_MINIMUM_STAKE),
    }
}
