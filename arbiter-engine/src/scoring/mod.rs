//! Reputation scoring for rated agents.
//!
//! Recomputes an agent's aggregate score from its full feedback history
//! using a recency/stake-weighted average. Disputed and removed entries are
//! excluded; an agent with no countable feedback sits at the neutral 5000.
//!
//! ## Modules
//!
//! - [`weights`] — per-entry weight and score factors
//! - [`scorer`] — full-rescan recompute and cached reads

pub mod scorer;
pub mod weights;

pub use scorer::ReputationScorer;
