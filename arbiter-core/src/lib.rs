//! # arbiter-core
//!
//! Foundation crate for the Arbiter reputation engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::EngineConfig;
pub use errors::{ArbiterError, ArbiterResult};
pub use models::events::{EngineEvent, EventRecord};
pub use models::feedback::{Feedback, FeedbackId, FeedbackType};
pub use models::principal::{AgentId, Principal, Role};
pub use models::reputation::{ReputationScore, ScoreSummary};
