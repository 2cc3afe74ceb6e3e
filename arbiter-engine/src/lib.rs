//! # arbiter-engine
//!
//! The reputation-and-dispute engine: ingests feedback events about
//! autonomous agents, maintains a time/stake-weighted score per agent, and
//! arbitrates disputes over escrowed stakes.
//!
//! ## Modules
//!
//! - [`ledger`] — append-only feedback records and reads
//! - [`scoring`] — full-rescan reputation recompute
//! - [`dispute`] — dispute/resolve state machine
//! - [`vault`] — stake escrow custody and release
//! - [`rbac`] — capability grants and checks
//! - [`events`] — append-only engine event log
//!
//! [`ReputationEngine`] ties these together and serializes every mutating
//! operation as one all-or-nothing transaction on the single write
//! connection.

pub mod dispute;
pub mod engine;
pub mod events;
pub mod ledger;
pub mod rbac;
pub mod scoring;
pub mod vault;

pub use dispute::{DisputeResolver, Resolution, StakeDisposition};
pub use engine::{EngineStats, ReputationEngine};
pub use ledger::{FeedbackLedger, NewFeedback};
pub use scoring::ReputationScorer;
pub use vault::{InMemoryBook, StakeVault};
