//! Identity directory boundary.
//!
//! Agent existence, liveness, and ownership belong to an external identity
//! directory; the engine only consults it at the start of an operation.

use crate::errors::ArbiterResult;
use crate::models::principal::{AgentId, Principal};

/// Read-only view of the external identity directory.
pub trait IIdentityDirectory: Send + Sync {
    /// Whether the agent exists and is currently active.
    fn is_agent_active(&self, agent_id: &AgentId) -> ArbiterResult<bool>;

    /// Owner of the agent, or `None` when the agent is unknown.
    fn agent_owner(&self, agent_id: &AgentId) -> ArbiterResult<Option<Principal>>;
}
