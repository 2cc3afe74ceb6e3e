//! Ledger tests — posting, validation, reads, and staked ingestion.

use std::sync::Arc;

use arbiter_core::config::EngineConfig;
use arbiter_core::errors::{ArbiterError, LedgerError, VaultError};
use arbiter_core::models::events::EngineEvent;
use arbiter_core::models::feedback::{FeedbackId, FeedbackType};
use arbiter_core::models::principal::Principal;

use arbiter_engine::{InMemoryBook, ReputationEngine};

use test_fixtures::{agent, principal, StaticDirectory};

fn setup() -> (ReputationEngine, Arc<StaticDirectory>, Arc<InMemoryBook>, Principal) {
    test_fixtures::init_tracing();
    let directory = Arc::new(StaticDirectory::new());
    let book = Arc::new(InMemoryBook::new());
    let admin = principal("admin");
    let config = EngineConfig {
        bootstrap_admin: admin.as_str().to_string(),
        ..Default::default()
    };
    let engine = ReputationEngine::open_in_memory(config, directory.clone(), book.clone())
        .expect("open engine");
    (engine, directory, book, admin)
}

/// Ids are assigned sequentially starting at 1.
#[test]
fn post_assigns_sequential_ids_from_one() {
    let (engine, directory, _book, _admin) = setup();
    let reviewer = principal("reviewer");
    let rated = agent("agent");
    directory.register(&rated, &principal("owner"));

    for expected in 1..=3u64 {
        let id = engine
            .post_feedback(&reviewer, &rated, FeedbackType::Positive, 80, "ctx", "")
            .expect("post feedback");
        assert_eq!(id, FeedbackId(expected));
    }
}

/// Boundary ratings 0 and 100 are accepted.
#[test]
fn post_accepts_boundary_ratings() {
    let (engine, directory, _book, _admin) = setup();
    let reviewer = principal("reviewer");
    let rated = agent("agent");
    directory.register(&rated, &principal("owner"));

    engine
        .post_feedback(&reviewer, &rated, FeedbackType::Positive, 0, "", "")
        .expect("rating 0");
    engine
        .post_feedback(&reviewer, &rated, FeedbackType::Positive, 100, "", "")
        .expect("rating 100");
}

/// A rating above 100 is rejected before any state changes.
#[test]
fn post_rejects_rating_above_100_without_state_change() {
    let (engine, directory, _book, _admin) = setup();
    let reviewer = principal("reviewer");
    let rated = agent("agent");
    directory.register(&rated, &principal("owner"));

    let err = engine
        .post_feedback(&reviewer, &rated, FeedbackType::Positive, 101, "", "")
        .unwrap_err();
    assert!(matches!(
        err,
        ArbiterError::Ledger(LedgerError::InvalidRating { rating: 101 })
    ));

    let stats = engine.stats().expect("stats");
    assert_eq!(stats.total_feedback, 0);
    assert_eq!(
        engine
            .count_by_type(&rated, FeedbackType::Positive)
            .expect("count"),
        0
    );
    let summary = engine.reputation(&rated).expect("reputation");
    assert_eq!(summary.score.value(), 5000);
    assert_eq!(summary.considered, 0);
}

/// Posting against an unknown or deactivated agent is rejected.
#[test]
fn post_rejects_unknown_or_inactive_agent() {
    let (engine, directory, _book, _admin) = setup();
    let reviewer = principal("reviewer");

    let unknown = agent("never-registered");
    let err = engine
        .post_feedback(&reviewer, &unknown, FeedbackType::Positive, 50, "", "")
        .unwrap_err();
    assert!(matches!(
        err,
        ArbiterError::Ledger(LedgerError::UnknownOrInactiveAgent(_))
    ));

    let dormant = agent("dormant");
    directory.register(&dormant, &principal("owner"));
    directory.deactivate(&dormant);
    let err = engine
        .post_feedback(&reviewer, &dormant, FeedbackType::Positive, 50, "", "")
        .unwrap_err();
    assert!(matches!(
        err,
        ArbiterError::Ledger(LedgerError::UnknownOrInactiveAgent(_))
    ));
}

/// Reads return the stored record, and both indices mirror the ledger.
#[test]
fn reads_return_stored_records_and_indices() {
    let (engine, directory, _book, _admin) = setup();
    let r1 = principal("reviewer-1");
    let r2 = principal("reviewer-2");
    let rated = agent("agent");
    directory.register(&rated, &principal("owner"));

    let id1 = engine
        .post_feedback(&r1, &rated, FeedbackType::Positive, 90, "hash-1", "meta-1")
        .expect("post 1");
    let id2 = engine
        .post_feedback(&r2, &rated, FeedbackType::Negative, 20, "hash-2", "")
        .expect("post 2");

    let feedback = engine.get_feedback(id1).expect("get");
    assert_eq!(feedback.reviewer, r1);
    assert_eq!(feedback.agent_id, rated);
    assert_eq!(feedback.feedback_type, FeedbackType::Positive);
    assert_eq!(feedback.rating, 90);
    assert_eq!(feedback.context_hash, "hash-1");
    assert_eq!(feedback.metadata, "meta-1");
    assert_eq!(feedback.stake, 0);
    assert!(!feedback.disputed);
    assert!(!feedback.removed);

    let by_agent = engine.feedback_by_agent(&rated).expect("by agent");
    assert_eq!(
        by_agent.iter().map(|f| f.id).collect::<Vec<_>>(),
        vec![id1, id2]
    );
    let by_reviewer = engine.feedback_by_reviewer(&r2).expect("by reviewer");
    assert_eq!(by_reviewer.len(), 1);
    assert_eq!(by_reviewer[0].id, id2);

    assert_eq!(
        engine
            .count_by_type(&rated, FeedbackType::Positive)
            .expect("count"),
        1
    );
    assert_eq!(
        engine
            .count_by_type(&rated, FeedbackType::Negative)
            .expect("count"),
        1
    );
}

/// An id that was never created fails `NotFound`.
#[test]
fn get_feedback_unknown_id_fails_not_found() {
    let (engine, _directory, _book, _admin) = setup();
    let err = engine.get_feedback(FeedbackId(999)).unwrap_err();
    assert!(matches!(
        err,
        ArbiterError::Ledger(LedgerError::NotFound(999))
    ));
}

/// Posting appends `FeedbackPosted` and `ReputationUpdated` to the log.
#[test]
fn post_appends_events() {
    let (engine, directory, _book, _admin) = setup();
    let reviewer = principal("reviewer");
    let rated = agent("agent");
    directory.register(&rated, &principal("owner"));

    let id = engine
        .post_feedback(&reviewer, &rated, FeedbackType::Positive, 90, "ctx", "")
        .expect("post");

    let for_feedback = engine.events_for_feedback(id).expect("events");
    assert_eq!(for_feedback.len(), 1);
    assert!(matches!(
        &for_feedback[0].event,
        EngineEvent::FeedbackPosted { rating: 90, .. }
    ));

    let recent = engine.recent_events(10).expect("recent");
    assert!(recent
        .iter()
        .any(|r| matches!(&r.event, EngineEvent::ReputationUpdated { new_score: 9000, .. })));
}

/// A stake below the minimum is rejected and nothing is committed.
#[test]
fn staked_post_below_minimum_fails() {
    let (engine, directory, book, _admin) = setup();
    let reviewer = principal("reviewer");
    let rated = agent("agent");
    directory.register(&rated, &principal("owner"));
    book.deposit(&reviewer, 1_000);

    let err = engine
        .post_staked_feedback(&reviewer, &rated, FeedbackType::Negative, 20, "", "", 50)
        .unwrap_err();
    assert!(matches!(
        err,
        ArbiterError::Ledger(LedgerError::InsufficientStake {
            provided: 50,
            minimum: 100
        })
    ));
    assert_eq!(engine.stats().expect("stats").total_feedback, 0);
    assert_eq!(book.balance(&reviewer), 1_000);
}

/// A staked post escrows the attached value with the vault.
#[test]
fn staked_post_moves_stake_into_custody() {
    let (engine, directory, book, _admin) = setup();
    let reviewer = principal("reviewer");
    let rated = agent("agent");
    directory.register(&rated, &principal("owner"));
    book.deposit(&reviewer, 1_000);

    let id = engine
        .post_staked_feedback(&reviewer, &rated, FeedbackType::Negative, 20, "", "", 400)
        .expect("staked post");

    assert_eq!(engine.get_feedback(id).expect("get").stake, 400);
    assert_eq!(book.balance(&reviewer), 600);
    assert_eq!(engine.stats().expect("stats").escrowed, 400);
}

/// A failed stake transfer aborts the whole post — no record, no counter,
/// no score change.
#[test]
fn staked_post_with_insufficient_balance_rolls_back() {
    let (engine, directory, book, _admin) = setup();
    let reviewer = principal("broke-reviewer");
    let rated = agent("agent");
    directory.register(&rated, &principal("owner"));
    // No deposit — the transfer into custody must fail.

    let err = engine
        .post_staked_feedback(&reviewer, &rated, FeedbackType::Negative, 20, "", "", 200)
        .unwrap_err();
    assert!(matches!(
        err,
        ArbiterError::Vault(VaultError::TransferFailed { amount: 200, .. })
    ));

    let stats = engine.stats().expect("stats");
    assert_eq!(stats.total_feedback, 0);
    assert_eq!(stats.escrowed, 0);
    assert_eq!(
        engine
            .count_by_type(&rated, FeedbackType::Negative)
            .expect("count"),
        0
    );
    assert_eq!(book.balance(&reviewer), 0);
}

/// An original rating of zero is stored but never scored.
#[test]
fn zero_rating_post_is_stored_but_not_scored() {
    let (engine, directory, _book, _admin) = setup();
    let reviewer = principal("reviewer");
    let rated = agent("agent");
    directory.register(&rated, &principal("owner"));

    let id = engine
        .post_feedback(&reviewer, &rated, FeedbackType::Positive, 0, "", "")
        .expect("post");
    assert_eq!(engine.get_feedback(id).expect("get").rating, 0);

    let summary = engine.reputation(&rated).expect("reputation");
    assert_eq!(summary.score.value(), 5000);
    assert_eq!(summary.considered, 0);
}
