//! Error types for the Arbiter engine.
//!
//! Each domain defines its own error enum; `ArbiterError` aggregates them.
//! Every error aborts the whole operation atomically — there are no partial
//! commits and no automatic retries.

mod dispute_error;
mod ledger_error;
mod storage_error;
mod vault_error;

pub use dispute_error::DisputeError;
pub use ledger_error::LedgerError;
pub use storage_error::StorageError;
pub use vault_error::VaultError;

/// Convenience alias used across the workspace.
pub type ArbiterResult<T> = Result<T, ArbiterError>;

/// Top-level error, aggregating each domain's failures.
#[derive(Debug, thiserror::Error)]
pub enum ArbiterError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Dispute(#[from] DisputeError),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Caller lacks the capability required by a privileged operation.
    #[error("unauthorized: {principal} lacks {role}")]
    Unauthorized { principal: String, role: String },

    /// A value failed to serialize or deserialize.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}
