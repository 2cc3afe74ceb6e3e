/// Arbiter system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Upper bound of the rating scale.
pub const RATING_MAX: u8 = 100;

/// Neutral reputation score (fixed-point, 2 implied decimals).
pub const SCORE_NEUTRAL: u64 = 5_000;

/// Maximum reputation score.
pub const SCORE_MAX: u64 = 10_000;

/// Recency window in days. Feedback older than this carries minimum weight.
pub const RECENCY_WINDOW_DAYS: i64 = 365;

/// Seconds per day, the granularity of the recency weight.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Weight multiplier applied to escrow-backed feedback.
pub const STAKE_WEIGHT_MULTIPLIER: u64 = 2;

/// Minimum stake seeded into a fresh ledger before an admin changes it.
pub const DEFAULT_MINIMUM_STAKE: u64 = 100;

/// Principal that holds escrowed value while a stake is in custody.
pub const VAULT_PRINCIPAL: &str = "arbiter://vault";
