/// Validation failures raised by the feedback ledger before any mutation.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Rating exceeds the 0–100 scale.
    #[error("invalid rating {rating}: must be at most 100")]
    InvalidRating { rating: u8 },

    /// The identity directory reports the agent missing or inactive.
    #[error("unknown or inactive agent: {0}")]
    UnknownOrInactiveAgent(String),

    /// Attached value is below the configured minimum stake.
    #[error("stake {provided} below minimum {minimum}")]
    InsufficientStake { provided: u64, minimum: u64 },

    /// The feedback id was never created.
    #[error("feedback not found: {0}")]
    NotFound(u64),
}
