//! Value transfer boundary used by the stake vault.

use crate::errors::ArbiterResult;
use crate::models::principal::Principal;

/// Moves value between principals.
///
/// Implementations must either complete a transfer fully or leave balances
/// untouched — the vault relies on this to keep custody bookkeeping and
/// actual balances in agreement when an operation rolls back.
pub trait IValueTransfer: Send + Sync {
    fn transfer(&self, from: &Principal, to: &Principal, amount: u64) -> ArbiterResult<()>;
}
