//! ReputationEngine — the serialized front door for every ledger operation.
//!
//! Each mutating operation acquires the single write connection and runs as
//! one SQLite transaction: either every index update, counter, score
//! recompute, escrow row, and event commits together, or none of them are
//! observed. Reads go to the read pool and see only committed state.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use arbiter_core::config::EngineConfig;
use arbiter_core::errors::ArbiterResult;
use arbiter_core::models::events::EventRecord;
use arbiter_core::models::feedback::{Feedback, FeedbackId, FeedbackType};
use arbiter_core::models::principal::{AgentId, Principal, Role};
use arbiter_core::models::reputation::ScoreSummary;
use arbiter_core::traits::{IIdentityDirectory, IValueTransfer};

use arbiter_storage::queries::{capability_ops, escrow_ops, feedback_ops, score_ops, settings_ops};
use arbiter_storage::to_storage_err;
use arbiter_storage::StorageEngine;

use crate::dispute::{DisputeResolver, Resolution, StakeDisposition};
use crate::events::EventLogger;
use crate::ledger::post::MIN_STAKE_KEY;
use crate::ledger::{self, FeedbackLedger, NewFeedback};
use crate::rbac;
use crate::scoring::ReputationScorer;
use crate::vault::ResolutionGuard;

/// Ledger-wide totals for operators and indexers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EngineStats {
    pub total_feedback: u64,
    pub disputed: u64,
    pub escrowed: u64,
    pub scored_agents: u64,
}

/// The reputation-and-dispute engine.
pub struct ReputationEngine {
    storage: StorageEngine,
    directory: Arc<dyn IIdentityDirectory>,
    book: Arc<dyn IValueTransfer>,
    guard: ResolutionGuard,
}

impl ReputationEngine {
    /// Open a file-backed engine.
    pub fn open(
        path: &Path,
        config: EngineConfig,
        directory: Arc<dyn IIdentityDirectory>,
        book: Arc<dyn IValueTransfer>,
    ) -> ArbiterResult<Self> {
        let storage = StorageEngine::open(path, config.read_pool_size)?;
        Self::bootstrap(storage, config, directory, book)
    }

    /// Open an in-memory engine (tests, ephemeral ledgers).
    pub fn open_in_memory(
        config: EngineConfig,
        directory: Arc<dyn IIdentityDirectory>,
        book: Arc<dyn IValueTransfer>,
    ) -> ArbiterResult<Self> {
        let storage = StorageEngine::open_in_memory()?;
        Self::bootstrap(storage, config, directory, book)
    }

    /// Seed the minimum-stake setting and the bootstrap admin on a fresh
    /// ledger; an existing ledger keeps its persisted values.
    fn bootstrap(
        storage: StorageEngine,
        config: EngineConfig,
        directory: Arc<dyn IIdentityDirectory>,
        book: Arc<dyn IValueTransfer>,
    ) -> ArbiterResult<Self> {
        let engine = Self {
            storage,
            directory,
            book,
            guard: ResolutionGuard::new(),
        };
        engine.in_write_tx(|conn| {
            if settings_ops::get_setting(conn, MIN_STAKE_KEY)?.is_none() {
                settings_ops::set_setting(conn, MIN_STAKE_KEY, &config.minimum_stake.to_string())?;
            }
            if capability_ops::grant_count(conn, Role::Admin.as_str())? == 0 {
                let admin = Principal::from(config.bootstrap_admin.as_str());
                rbac::grant(conn, Role::Admin, &admin, &admin, Utc::now())?;
                info!(admin = %admin, "bootstrap admin granted");
            }
            Ok(())
        })?;
        Ok(engine)
    }

    /// Run a closure as one all-or-nothing transaction on the writer.
    fn in_write_tx<F, T>(&self, f: F) -> ArbiterResult<T>
    where
        F: FnOnce(&Connection) -> ArbiterResult<T>,
    {
        self.storage.pool().writer.with_conn_sync(|conn| {
            let tx = conn
                .unchecked_transaction()
                .map_err(|e| to_storage_err(format!("begin: {e}")))?;
            match f(&tx) {
                Ok(value) => {
                    tx.commit()
                        .map_err(|e| to_storage_err(format!("commit: {e}")))?;
                    Ok(value)
                }
                Err(e) => {
                    let _ = tx.rollback();
                    Err(e)
                }
            }
        })
    }

    // ── Ledger ──────────────────────────────────────────────────────────────

    /// Post an unstaked feedback entry; returns the assigned id.
    #[instrument(skip(self))]
    pub fn post_feedback(
        &self,
        reviewer: &Principal,
        agent_id: &AgentId,
        feedback_type: FeedbackType,
        rating: u8,
        context_hash: &str,
        metadata: &str,
    ) -> ArbiterResult<FeedbackId> {
        let now = Utc::now();
        self.in_write_tx(|conn| {
            FeedbackLedger::post(
                conn,
                self.directory.as_ref(),
                &NewFeedback {
                    reviewer,
                    agent_id,
                    feedback_type,
                    rating,
                    context_hash,
                    metadata,
                },
                now,
            )
        })
    }

    /// Post a feedback entry backed by `stake`, escrowed with the vault.
    #[instrument(skip(self))]
    pub fn post_staked_feedback(
        &self,
        reviewer: &Principal,
        agent_id: &AgentId,
        feedback_type: FeedbackType,
        rating: u8,
        context_hash: &str,
        metadata: &str,
        stake: u64,
    ) -> ArbiterResult<FeedbackId> {
        let now = Utc::now();
        self.in_write_tx(|conn| {
            FeedbackLedger::post_staked(
                conn,
                self.directory.as_ref(),
                self.book.as_ref(),
                &NewFeedback {
                    reviewer,
                    agent_id,
                    feedback_type,
                    rating,
                    context_hash,
                    metadata,
                },
                stake,
                now,
            )
        })
    }

    /// Get a feedback entry by id.
    pub fn get_feedback(&self, id: FeedbackId) -> ArbiterResult<Feedback> {
        self.storage.with_reader(|conn| ledger::reads::get(conn, id))
    }

    /// All feedback for an agent, ordered by id.
    pub fn feedback_by_agent(&self, agent_id: &AgentId) -> ArbiterResult<Vec<Feedback>> {
        self.storage
            .with_reader(|conn| ledger::reads::by_agent(conn, agent_id))
    }

    /// All feedback submitted by a reviewer, ordered by id.
    pub fn feedback_by_reviewer(&self, reviewer: &Principal) -> ArbiterResult<Vec<Feedback>> {
        self.storage
            .with_reader(|conn| ledger::reads::by_reviewer(conn, reviewer))
    }

    /// Running total for an agent/type pair.
    pub fn count_by_type(
        &self,
        agent_id: &AgentId,
        feedback_type: FeedbackType,
    ) -> ArbiterResult<u64> {
        self.storage
            .with_reader(|conn| ledger::reads::count_by_type(conn, agent_id, feedback_type))
    }

    /// Cached reputation for an agent; neutral when never scored.
    pub fn reputation(&self, agent_id: &AgentId) -> ArbiterResult<ScoreSummary> {
        self.storage
            .with_reader(|conn| ReputationScorer::cached(conn, agent_id))
    }

    /// Current minimum stake for staked posts.
    pub fn minimum_stake(&self) -> ArbiterResult<u64> {
        self.storage
            .with_reader(ledger::post::minimum_stake)
    }

    // ── Disputes ────────────────────────────────────────────────────────────

    /// Contest a feedback entry. The caller must own the rated agent or hold
    /// the dispute-resolver capability.
    #[instrument(skip(self))]
    pub fn dispute(&self, caller: &Principal, id: FeedbackId, reason: &str) -> ArbiterResult<()> {
        let now = Utc::now();
        self.in_write_tx(|conn| {
            DisputeResolver::dispute(conn, self.directory.as_ref(), caller, id, reason, now)
        })
    }

    /// Arbitrate a disputed entry. Dispute-resolver capability required.
    ///
    /// The resolution guard is held for the whole operation: a nested call —
    /// for this feedback id or any other — fails instead of re-entering
    /// custody bookkeeping.
    #[instrument(skip(self))]
    pub fn resolve(
        &self,
        caller: &Principal,
        id: FeedbackId,
        remove_feedback: bool,
        disposition: StakeDisposition,
    ) -> ArbiterResult<Resolution> {
        let _permit = self.guard.enter()?;
        let now = Utc::now();
        self.in_write_tx(|conn| {
            DisputeResolver::resolve(
                conn,
                self.book.as_ref(),
                caller,
                id,
                remove_feedback,
                disposition,
                now,
            )
        })
    }

    // ── Administration ──────────────────────────────────────────────────────

    /// Change the minimum stake. Admin only; takes effect immediately for
    /// subsequent staked posts and never retroactively.
    #[instrument(skip(self))]
    pub fn set_minimum_stake(&self, caller: &Principal, amount: u64) -> ArbiterResult<()> {
        self.in_write_tx(|conn| {
            rbac::require(conn, Role::Admin, caller)?;
            settings_ops::set_setting(conn, MIN_STAKE_KEY, &amount.to_string())?;
            info!(caller = %caller, amount, "minimum stake changed");
            Ok(())
        })
    }

    /// Grant a role. Admin only.
    #[instrument(skip(self))]
    pub fn grant_role(
        &self,
        caller: &Principal,
        role: Role,
        principal: &Principal,
    ) -> ArbiterResult<()> {
        let now = Utc::now();
        self.in_write_tx(|conn| {
            rbac::require(conn, Role::Admin, caller)?;
            rbac::grant(conn, role, principal, caller, now)
        })
    }

    /// Revoke a role. Admin only.
    #[instrument(skip(self))]
    pub fn revoke_role(
        &self,
        caller: &Principal,
        role: Role,
        principal: &Principal,
    ) -> ArbiterResult<()> {
        self.in_write_tx(|conn| {
            rbac::require(conn, Role::Admin, caller)?;
            rbac::revoke(conn, role, principal)
        })
    }

    /// Whether a principal holds a role.
    pub fn has_role(&self, role: Role, principal: &Principal) -> ArbiterResult<bool> {
        self.storage
            .with_reader(|conn| rbac::has_capability(conn, role, principal))
    }

    // ── Events & stats ──────────────────────────────────────────────────────

    /// All events concerning one feedback entry, in log order.
    pub fn events_for_feedback(&self, id: FeedbackId) -> ArbiterResult<Vec<EventRecord>> {
        self.storage
            .with_reader(|conn| EventLogger::for_feedback(conn, id))
    }

    /// The most recent `limit` events, oldest first.
    pub fn recent_events(&self, limit: usize) -> ArbiterResult<Vec<EventRecord>> {
        self.storage
            .with_reader(|conn| EventLogger::recent(conn, limit))
    }

    /// Ledger-wide totals.
    pub fn stats(&self) -> ArbiterResult<EngineStats> {
        self.storage.with_reader(|conn| {
            Ok(EngineStats {
                total_feedback: feedback_ops::total_count(conn)?,
                disputed: feedback_ops::disputed_count(conn)?,
                escrowed: escrow_ops::escrowed_total(conn)?,
                scored_agents: score_ops::scored_agent_count(conn)?,
            })
        })
    }
}
