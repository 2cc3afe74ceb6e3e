/// State-conflict failures raised by the dispute lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum DisputeError {
    /// The entry is already under dispute.
    #[error("feedback {0} is already disputed")]
    AlreadyDisputed(u64),

    /// The entry is not currently disputed.
    #[error("feedback {0} is not disputed")]
    NotDisputed(u64),
}
