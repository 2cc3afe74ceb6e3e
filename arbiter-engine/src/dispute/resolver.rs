//! DisputeResolver — contest and arbitrate feedback entries.
//!
//! Authorization and state checks run before any mutation. A resolution
//! stages its counter, rating, and escrow changes inside the caller's
//! transaction; a failed stake transfer aborts all of them, so a failed
//! payout never leaves the dispute "resolved" with money stuck or misrouted.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::{debug, instrument};

use arbiter_core::errors::{ArbiterError, ArbiterResult, DisputeError, LedgerError};
use arbiter_core::models::feedback::FeedbackId;
use arbiter_core::models::principal::{AgentId, Principal, Role};
use arbiter_core::traits::{IIdentityDirectory, IValueTransfer};

use arbiter_storage::queries::feedback_ops;

use crate::events::EventLogger;
use crate::rbac;
use crate::scoring::ReputationScorer;
use crate::vault::StakeVault;

/// Where a released stake goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StakeDisposition {
    /// Return the full stake to the original reviewer.
    Refund,
    /// Move the full stake to a resolver-designated recipient.
    Slash { recipient: Principal },
}

/// Outcome of a resolution, echoed to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub id: FeedbackId,
    pub removed: bool,
    pub slashed: bool,
    /// Amount released from escrow; 0 when the entry carried no stake.
    pub stake_released: u64,
}

/// Arbitrates disputes over feedback entries.
pub struct DisputeResolver;

impl DisputeResolver {
    /// Flag a feedback entry as disputed.
    ///
    /// The caller must own the rated agent (per the identity directory) or
    /// hold the dispute-resolver capability.
    #[instrument(skip(conn, directory))]
    pub fn dispute(
        conn: &Connection,
        directory: &dyn IIdentityDirectory,
        caller: &Principal,
        id: FeedbackId,
        reason: &str,
        now: DateTime<Utc>,
    ) -> ArbiterResult<()> {
        let row = feedback_ops::get_feedback(conn, id.0)?
            .ok_or(LedgerError::NotFound(id.0))?;
        if row.disputed {
            return Err(DisputeError::AlreadyDisputed(id.0).into());
        }

        let agent_id = AgentId::from(row.agent_id.as_str());
        if !Self::may_dispute(conn, directory, caller, &agent_id)? {
            return Err(ArbiterError::Unauthorized {
                principal: caller.to_string(),
                role: format!("owner of {agent_id} or {}", Role::DisputeResolver),
            });
        }

        feedback_ops::set_disputed(conn, id.0, true)?;
        EventLogger::feedback_disputed(conn, id, caller, reason, now)?;
        debug!(id = %id, caller = %caller, "feedback disputed");
        Ok(())
    }

    fn may_dispute(
        conn: &Connection,
        directory: &dyn IIdentityDirectory,
        caller: &Principal,
        agent_id: &AgentId,
    ) -> ArbiterResult<bool> {
        if rbac::has_capability(conn, Role::DisputeResolver, caller)? {
            return Ok(true);
        }
        Ok(directory.agent_owner(agent_id)?.as_ref() == Some(caller))
    }

    /// Resolve a disputed entry. Dispute-resolver capability required.
    ///
    /// With `remove_feedback` the entry's counter is decremented, its rating
    /// zeroed (the record is retained for audit), and the agent's score
    /// recomputed. Otherwise only the dispute flag clears. Any escrowed
    /// stake is released per `disposition` and the stake column zeroed.
    #[instrument(skip(conn, book))]
    pub fn resolve(
        conn: &Connection,
        book: &dyn IValueTransfer,
        caller: &Principal,
        id: FeedbackId,
        remove_feedback: bool,
        disposition: StakeDisposition,
        now: DateTime<Utc>,
    ) -> ArbiterResult<Resolution> {
        rbac::require(conn, Role::DisputeResolver, caller)?;

        let row = feedback_ops::get_feedback(conn, id.0)?
            .ok_or(LedgerError::NotFound(id.0))?;
        if !row.disputed {
            return Err(DisputeError::NotDisputed(id.0).into());
        }
        let agent_id = AgentId::from(row.agent_id.as_str());

        if remove_feedback {
            // A re-disputed entry may already be removed; decrement its
            // counter at most once.
            if !row.removed {
                feedback_ops::decrement_count(conn, &row.agent_id, &row.feedback_type)?;
            }
            feedback_ops::mark_removed(conn, id.0)?;
        } else {
            feedback_ops::set_disputed(conn, id.0, false)?;
        }

        let mut slashed = false;
        let mut stake_released = 0;
        if row.stake > 0 {
            let recipient = match &disposition {
                StakeDisposition::Refund => Principal::from(row.reviewer.as_str()),
                StakeDisposition::Slash { recipient } => {
                    slashed = true;
                    recipient.clone()
                }
            };
            stake_released = StakeVault::release(conn, book, id, &recipient, now)?;
            feedback_ops::zero_stake(conn, id.0)?;
        }

        if remove_feedback {
            ReputationScorer::recompute(conn, &agent_id, now)?;
        }

        EventLogger::dispute_resolved(conn, id, remove_feedback, slashed, caller, now)?;
        debug!(
            id = %id,
            removed = remove_feedback,
            slashed,
            stake_released,
            "dispute resolved"
        );
        Ok(Resolution {
            id,
            removed: remove_feedback,
            slashed,
            stake_released,
        })
    }
}
