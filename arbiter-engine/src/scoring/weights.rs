//! Weight and score factors for a single feedback entry.

use chrono::{DateTime, Utc};

use arbiter_core::constants::{
    RECENCY_WINDOW_DAYS, SCORE_NEUTRAL, SECONDS_PER_DAY, STAKE_WEIGHT_MULTIPLIER,
};
use arbiter_core::models::feedback::FeedbackType;

/// Linear recency weight in whole days.
///
/// ```text
/// age > 365d  ->  1
/// otherwise   ->  (365d - age)/1d + 1      (floor division)
/// ```
///
/// Same-moment feedback weighs 366; anything older than the window weighs 1.
pub fn time_weight(posted_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let age_secs = (now - posted_at).num_seconds();
    let window_secs = RECENCY_WINDOW_DAYS * SECONDS_PER_DAY;
    if age_secs > window_secs {
        1
    } else {
        ((window_secs - age_secs) / SECONDS_PER_DAY) as u64 + 1
    }
}

/// Stake weight: escrow-backed entries count double.
pub fn stake_weight(stake: u64) -> u64 {
    if stake > 0 {
        STAKE_WEIGHT_MULTIPLIER
    } else {
        1
    }
}

/// Base score contribution of an entry on the fixed-point 0–10000 scale.
///
/// Positive maps the rating up, negative inverts it. Everything else —
/// including dispute-typed entries — lands on the neutral midpoint.
pub fn entry_score(feedback_type: FeedbackType, rating: u8) -> u64 {
    match feedback_type {
        FeedbackType::Positive => u64::from(rating) * 100,
        FeedbackType::Negative => (100 - u64::from(rating.min(100))) * 100,
        FeedbackType::Neutral | FeedbackType::Dispute => SCORE_NEUTRAL,
    }
}
