//! Dispute lifecycle for feedback entries.
//!
//! Each entry is a flag-based state machine: Active → Disputed via
//! [`DisputeResolver::dispute`], Disputed → Resolved via
//! [`DisputeResolver::resolve`]. Resolved entries may be disputed again by a
//! fresh call — the state machine is a flag, not a one-shot.

pub mod resolver;

pub use resolver::{DisputeResolver, Resolution, StakeDisposition};
