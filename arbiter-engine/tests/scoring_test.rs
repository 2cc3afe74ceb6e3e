//! Scoring tests — weight factors and full-rescan recompute with fixed
//! clocks, driven at the component layer so timestamps are exact.

use chrono::{Duration, TimeZone, Utc};

use arbiter_core::models::feedback::FeedbackType;
use arbiter_core::models::principal::{AgentId, Principal};

use arbiter_engine::ledger::{FeedbackLedger, NewFeedback};
use arbiter_engine::scoring::{weights, ReputationScorer};
use arbiter_engine::InMemoryBook;

use arbiter_storage::queries::feedback_ops;
use arbiter_storage::StorageEngine;

use test_fixtures::{agent, principal, StaticDirectory};

fn storage() -> StorageEngine {
    test_fixtures::init_tracing();
    StorageEngine::open_in_memory().expect("open in-memory storage")
}

fn directory_with(rated: &AgentId) -> StaticDirectory {
    let directory = StaticDirectory::new();
    directory.register(rated, &principal("owner"));
    directory
}

fn entry<'a>(
    reviewer: &'a Principal,
    rated: &'a AgentId,
    feedback_type: FeedbackType,
    rating: u8,
) -> NewFeedback<'a> {
    NewFeedback {
        reviewer,
        agent_id: rated,
        feedback_type,
        rating,
        context_hash: "",
        metadata: "",
    }
}

/// Same-moment feedback weighs 366; the weight decays linearly by whole days
/// down to a floor of 1 past the window.
#[test]
fn time_weight_decays_linearly_with_floor() {
    let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(weights::time_weight(t0, t0), 366);
    assert_eq!(weights::time_weight(t0, t0 + Duration::days(1)), 365);
    assert_eq!(weights::time_weight(t0, t0 + Duration::days(364)), 2);
    assert_eq!(weights::time_weight(t0, t0 + Duration::days(365)), 1);
    assert_eq!(weights::time_weight(t0, t0 + Duration::days(366)), 1);
    assert_eq!(weights::time_weight(t0, t0 + Duration::days(4000)), 1);
}

/// Sub-day ages round down: a few seconds of age already costs one day of
/// weight.
#[test]
fn time_weight_uses_floor_division() {
    let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(weights::time_weight(t0, t0 + Duration::seconds(5)), 365);
    assert_eq!(
        weights::time_weight(t0, t0 + Duration::seconds(86_399)),
        365
    );
}

/// Escrow-backed entries count double.
#[test]
fn stake_weight_doubles_staked_entries() {
    assert_eq!(weights::stake_weight(0), 1);
    assert_eq!(weights::stake_weight(1), 2);
    assert_eq!(weights::stake_weight(10_000), 2);
}

/// Positive maps up, negative inverts, neutral and dispute land on 5000.
#[test]
fn entry_score_per_type() {
    assert_eq!(weights::entry_score(FeedbackType::Positive, 90), 9_000);
    assert_eq!(weights::entry_score(FeedbackType::Positive, 0), 0);
    assert_eq!(weights::entry_score(FeedbackType::Negative, 20), 8_000);
    assert_eq!(weights::entry_score(FeedbackType::Negative, 100), 0);
    assert_eq!(weights::entry_score(FeedbackType::Neutral, 77), 5_000);
    assert_eq!(weights::entry_score(FeedbackType::Dispute, 77), 5_000);
}

/// An agent with no countable feedback sits at exactly 5000.
#[test]
fn agent_without_feedback_scores_neutral() {
    let eng = storage();
    let rated = agent("agent");
    eng.pool()
        .writer
        .with_conn_sync(|conn| {
            let summary = ReputationScorer::cached(conn, &rated)?;
            assert_eq!(summary.score.value(), 5000);
            assert_eq!(summary.considered, 0);

            let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
            let summary = ReputationScorer::recompute(conn, &rated, now)?;
            assert_eq!(summary.score.value(), 5000);
            assert_eq!(summary.considered, 0);
            Ok(())
        })
        .unwrap();
}

/// One positive entry, rating 90, unstaked: score 9000 with count 1.
#[test]
fn single_positive_entry_scores_nine_thousand() {
    let eng = storage();
    let rated = agent("agent-x");
    let directory = directory_with(&rated);
    let r1 = principal("reviewer-1");
    let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

    eng.pool()
        .writer
        .with_conn_sync(|conn| {
            FeedbackLedger::post(
                conn,
                &directory,
                &entry(&r1, &rated, FeedbackType::Positive, 90),
                t0,
            )?;
            let summary = ReputationScorer::cached(conn, &rated)?;
            assert_eq!(summary.score.value(), 9000);
            assert_eq!(summary.considered, 1);
            Ok(())
        })
        .unwrap();
}

/// Adding a staked negative entry (rating 20) at the same instant yields the
/// weighted aggregate (9000·366 + 8000·732)/(366 + 732) = 8333.
#[test]
fn staked_negative_entry_shifts_weighted_aggregate() {
    let eng = storage();
    let rated = agent("agent-x");
    let directory = directory_with(&rated);
    let r1 = principal("reviewer-1");
    let r2 = principal("reviewer-2");
    let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

    let book = InMemoryBook::new();
    book.deposit(&r2, 1_000);

    eng.pool()
        .writer
        .with_conn_sync(|conn| {
            FeedbackLedger::post(
                conn,
                &directory,
                &entry(&r1, &rated, FeedbackType::Positive, 90),
                t0,
            )?;
            FeedbackLedger::post_staked(
                conn,
                &directory,
                &book,
                &entry(&r2, &rated, FeedbackType::Negative, 20),
                500,
                t0,
            )?;
            let summary = ReputationScorer::cached(conn, &rated)?;
            assert_eq!(summary.score.value(), 8333);
            assert_eq!(summary.considered, 2);
            Ok(())
        })
        .unwrap();
}

/// A staked entry contributes exactly double the weight of an equivalent
/// unstaked one posted at the same instant.
#[test]
fn staked_entry_carries_double_weight() {
    let eng = storage();
    let rated = agent("agent-x");
    let directory = directory_with(&rated);
    let r1 = principal("reviewer-1");
    let r2 = principal("reviewer-2");
    let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

    let book = InMemoryBook::new();
    book.deposit(&r2, 1_000);

    eng.pool()
        .writer
        .with_conn_sync(|conn| {
            // Unstaked 9000-score entry vs staked 3000-score entry. With
            // double weight on the stake the aggregate is
            // (9000·366 + 3000·732)/(366 + 732) = 5000; equal weights
            // would give 6000.
            FeedbackLedger::post(
                conn,
                &directory,
                &entry(&r1, &rated, FeedbackType::Positive, 90),
                t0,
            )?;
            FeedbackLedger::post_staked(
                conn,
                &directory,
                &book,
                &entry(&r2, &rated, FeedbackType::Positive, 30),
                500,
                t0,
            )?;
            let summary = ReputationScorer::cached(conn, &rated)?;
            assert_eq!(summary.score.value(), 5000);
            Ok(())
        })
        .unwrap();
}

/// Dispute-typed submissions fall through to the neutral arm: they count as
/// 5000-score evidence rather than being excluded.
#[test]
fn dispute_typed_feedback_scores_as_neutral() {
    let eng = storage();
    let rated = agent("agent-x");
    let directory = directory_with(&rated);
    let r1 = principal("reviewer-1");
    let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

    eng.pool()
        .writer
        .with_conn_sync(|conn| {
            FeedbackLedger::post(
                conn,
                &directory,
                &entry(&r1, &rated, FeedbackType::Dispute, 77),
                t0,
            )?;
            let summary = ReputationScorer::cached(conn, &rated)?;
            assert_eq!(summary.score.value(), 5000);
            assert_eq!(summary.considered, 1);
            Ok(())
        })
        .unwrap();
}

/// Disputed entries are excluded: the next recompute behaves as if the
/// entry did not exist.
#[test]
fn disputed_entries_are_excluded_from_recompute() {
    let eng = storage();
    let rated = agent("agent-x");
    let directory = directory_with(&rated);
    let r1 = principal("reviewer-1");
    let r2 = principal("reviewer-2");
    let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

    eng.pool()
        .writer
        .with_conn_sync(|conn| {
            FeedbackLedger::post(
                conn,
                &directory,
                &entry(&r1, &rated, FeedbackType::Positive, 90),
                t0,
            )?;
            let id2 = FeedbackLedger::post(
                conn,
                &directory,
                &entry(&r2, &rated, FeedbackType::Negative, 20),
                t0,
            )?;

            feedback_ops::set_disputed(conn, id2.0, true)?;
            let summary = ReputationScorer::recompute(conn, &rated, t0)?;
            assert_eq!(summary.score.value(), 9000);
            assert_eq!(summary.considered, 1);

            feedback_ops::set_disputed(conn, id2.0, false)?;
            let summary = ReputationScorer::recompute(conn, &rated, t0)?;
            assert_eq!(summary.considered, 2);
            Ok(())
        })
        .unwrap();
}

/// Entries past the recency window still count, at the floor weight of 1.
#[test]
fn stale_entries_count_at_floor_weight() {
    let eng = storage();
    let rated = agent("agent-x");
    let directory = directory_with(&rated);
    let r1 = principal("reviewer-1");
    let r2 = principal("reviewer-2");
    let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let t1 = t0 + Duration::days(400);

    eng.pool()
        .writer
        .with_conn_sync(|conn| {
            FeedbackLedger::post(
                conn,
                &directory,
                &entry(&r1, &rated, FeedbackType::Positive, 100),
                t0,
            )?;
            FeedbackLedger::post(
                conn,
                &directory,
                &entry(&r2, &rated, FeedbackType::Neutral, 50),
                t1,
            )?;
            // (10000·1 + 5000·366)/367 = 5013 with floor division.
            let summary = ReputationScorer::cached(conn, &rated)?;
            assert_eq!(summary.score.value(), 5013);
            assert_eq!(summary.considered, 2);
            Ok(())
        })
        .unwrap();
}

/// Every recompute appends a `ReputationUpdated` event with the new score.
#[test]
fn recompute_appends_reputation_event() {
    use arbiter_core::models::events::EngineEvent;
    use arbiter_engine::events::EventLogger;

    let eng = storage();
    let rated = agent("agent-x");
    let directory = directory_with(&rated);
    let r1 = principal("reviewer-1");
    let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

    eng.pool()
        .writer
        .with_conn_sync(|conn| {
            FeedbackLedger::post(
                conn,
                &directory,
                &entry(&r1, &rated, FeedbackType::Positive, 90),
                t0,
            )?;
            let recent = EventLogger::recent(conn, 10)?;
            assert!(recent.iter().any(|r| matches!(
                &r.event,
                EngineEvent::ReputationUpdated {
                    new_score: 9000,
                    feedback_count: 1,
                    ..
                }
            )));
            Ok(())
        })
        .unwrap();
}
