//! Engine persistence — ledger state, settings, and grants survive reopen;
//! config only seeds a fresh ledger.

use std::sync::Arc;

use arbiter_core::config::EngineConfig;
use arbiter_core::models::feedback::FeedbackType;
use arbiter_core::models::principal::{Principal, Role};

use arbiter_engine::{InMemoryBook, ReputationEngine};

use test_fixtures::{agent, principal, StaticDirectory};

/// Feedback, scores, grants, and the admin-set minimum stake all survive an
/// engine reopen; the second open's config does not overwrite them.
#[test]
fn ledger_state_survives_reopen() {
    test_fixtures::init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("arbiter.db");

    let directory = Arc::new(StaticDirectory::new());
    let admin = principal("admin");
    let resolver = principal("resolver");
    let reviewer = principal("reviewer");
    let rated = agent("agent");
    directory.register(&rated, &principal("owner"));

    let id = {
        let book = Arc::new(InMemoryBook::new());
        let config = EngineConfig {
            bootstrap_admin: admin.as_str().to_string(),
            ..Default::default()
        };
        let engine = ReputationEngine::open(&db_path, config, directory.clone(), book)
            .expect("first open");
        engine
            .grant_role(&admin, Role::DisputeResolver, &resolver)
            .expect("grant");
        engine.set_minimum_stake(&admin, 777).expect("set minimum");
        engine
            .post_feedback(&reviewer, &rated, FeedbackType::Positive, 90, "ctx", "")
            .expect("post")
    };

    // Reopen with a different config: the persisted ledger wins.
    let book = Arc::new(InMemoryBook::new());
    let config = EngineConfig {
        minimum_stake: 5,
        bootstrap_admin: "arbiter://other-admin".to_string(),
        ..Default::default()
    };
    let engine =
        ReputationEngine::open(&db_path, config, directory, book).expect("second open");

    let feedback = engine.get_feedback(id).expect("get");
    assert_eq!(feedback.rating, 90);
    assert_eq!(feedback.reviewer, reviewer);

    let summary = engine.reputation(&rated).expect("reputation");
    assert_eq!(summary.score.value(), 9000);
    assert_eq!(summary.considered, 1);

    assert_eq!(engine.minimum_stake().expect("minimum"), 777);
    assert!(engine.has_role(Role::Admin, &admin).expect("has role"));
    assert!(engine
        .has_role(Role::DisputeResolver, &resolver)
        .expect("has role"));
    assert!(!engine
        .has_role(Role::Admin, &Principal::from("arbiter://other-admin"))
        .expect("has role"));

    let events = engine.events_for_feedback(id).expect("events");
    assert_eq!(events.len(), 1);
}
