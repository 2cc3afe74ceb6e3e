//! Shared fixtures for Arbiter tests: a static identity directory, a
//! refusing transfer stub, principal builders, and tracing setup.

use std::sync::Once;

use dashmap::DashMap;

use arbiter_core::errors::{ArbiterResult, VaultError};
use arbiter_core::models::principal::{AgentId, Principal};
use arbiter_core::traits::{IIdentityDirectory, IValueTransfer};

/// In-process identity directory with statically registered agents.
#[derive(Default)]
pub struct StaticDirectory {
    agents: DashMap<AgentId, AgentEntry>,
}

struct AgentEntry {
    owner: Principal,
    active: bool,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an active agent owned by `owner`.
    pub fn register(&self, agent_id: &AgentId, owner: &Principal) {
        self.agents.insert(
            agent_id.clone(),
            AgentEntry {
                owner: owner.clone(),
                active: true,
            },
        );
    }

    /// Mark an agent inactive without removing it.
    pub fn deactivate(&self, agent_id: &AgentId) {
        if let Some(mut entry) = self.agents.get_mut(agent_id) {
            entry.active = false;
        }
    }
}

impl IIdentityDirectory for StaticDirectory {
    fn is_agent_active(&self, agent_id: &AgentId) -> ArbiterResult<bool> {
        Ok(self
            .agents
            .get(agent_id)
            .map(|entry| entry.active)
            .unwrap_or(false))
    }

    fn agent_owner(&self, agent_id: &AgentId) -> ArbiterResult<Option<Principal>> {
        Ok(self.agents.get(agent_id).map(|entry| entry.owner.clone()))
    }
}

/// Value-transfer stub that refuses every transfer.
pub struct FailingBook;

impl IValueTransfer for FailingBook {
    fn transfer(&self, from: &Principal, to: &Principal, amount: u64) -> ArbiterResult<()> {
        Err(VaultError::TransferFailed {
            from: from.to_string(),
            to: to.to_string(),
            amount,
            reason: "transfer refused by fixture".to_string(),
        }
        .into())
    }
}

/// Fresh unique principal for a test.
pub fn principal(prefix: &str) -> Principal {
    Principal::from(format!("{prefix}-{}", uuid::Uuid::new_v4()))
}

/// Fresh unique agent id for a test.
pub fn agent(prefix: &str) -> AgentId {
    AgentId::from(format!("{prefix}-{}", uuid::Uuid::new_v4()))
}

/// Initialize test tracing once per process. Controlled by `RUST_LOG`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
