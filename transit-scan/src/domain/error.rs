//! Domain error types.
//!
//! These errors represent invariant violations while building journey
//! statistics. They are distinct from provider/IO errors.

use chrono::{DateTime, Utc};

/// Stats construction failed because an invariant does not hold.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidStats {
    /// The accumulated end time precedes the start time
    #[error("invalid stats: arrival {end} before departure {start}")]
    ArrivalBeforeDeparture {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// A custom stats type rejected its input
    #[error("invalid stats: {0}")]
    Rejected(&'static str),
}
