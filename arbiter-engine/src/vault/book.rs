//! In-process balance book, the default value-transfer backend.

use dashmap::DashMap;

use arbiter_core::errors::{ArbiterResult, VaultError};
use arbiter_core::models::principal::Principal;
use arbiter_core::traits::IValueTransfer;

/// Tracks balances per principal.
///
/// Deployments bridging to an external settlement layer substitute their own
/// [`IValueTransfer`] implementation; this book backs standalone ledgers and
/// tests.
#[derive(Default)]
pub struct InMemoryBook {
    balances: DashMap<Principal, u64>,
}

impl InMemoryBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit a principal with `amount` (seeding balances, bridged deposits).
    pub fn deposit(&self, principal: &Principal, amount: u64) {
        *self.balances.entry(principal.clone()).or_insert(0) += amount;
    }

    /// Current balance of a principal.
    pub fn balance(&self, principal: &Principal) -> u64 {
        self.balances.get(principal).map(|v| *v).unwrap_or(0)
    }
}

impl IValueTransfer for InMemoryBook {
    fn transfer(&self, from: &Principal, to: &Principal, amount: u64) -> ArbiterResult<()> {
        if amount == 0 {
            return Ok(());
        }
        {
            let mut from_balance = self.balances.entry(from.clone()).or_insert(0);
            let current = *from_balance;
            if current < amount {
                return Err(VaultError::TransferFailed {
                    from: from.to_string(),
                    to: to.to_string(),
                    amount,
                    reason: format!("balance {current} insufficient"),
                }
                .into());
            }
            *from_balance = current - amount;
            // Entry guard dropped here before touching `to` — same-key
            // transfers must not deadlock the shard lock.
        }
        *self.balances.entry(to.clone()).or_insert(0) += amount;
        Ok(())
    }
}
