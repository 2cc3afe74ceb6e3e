//! Principal, agent, and role identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an acting party: a reviewer, an agent owner, or a
/// capability holder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal(pub String);

impl Principal {
    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Principal {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifier of an agent being rated. Existence, activity, and ownership
/// are owned by the external identity directory; the engine only stores the
/// identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub String);

impl AgentId {
    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AgentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Named capabilities gating privileged operations.
///
/// Checks run against the immediate caller at the top of every privileged
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May change the minimum stake and grant or revoke roles.
    Admin,
    /// May resolve disputes, and may dispute on behalf of any agent.
    DisputeResolver,
}

impl Role {
    /// Stable identifier used for the capability table.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::DisputeResolver => "dispute_resolver",
        }
    }

    /// Parse a stored role identifier.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Role::Admin),
            "dispute_resolver" => Some(Role::DisputeResolver),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
