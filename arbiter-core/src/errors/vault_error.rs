/// Custody failures raised by the stake vault.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// The underlying value transfer did not succeed. The surrounding
    /// operation rolls back entirely; no other state may change.
    #[error("transfer of {amount} from {from} to {to} failed: {reason}")]
    TransferFailed {
        from: String,
        to: String,
        amount: u64,
        reason: String,
    },

    /// A resolution attempted to start while another was still executing.
    #[error("a resolution is already in progress")]
    ReentrantResolution,

    /// No escrow exists for the feedback entry.
    #[error("no escrow held for feedback {0}")]
    MissingEscrow(u64),

    /// The escrow for this entry was already released.
    #[error("escrow for feedback {0} already released")]
    AlreadyReleased(u64),
}
