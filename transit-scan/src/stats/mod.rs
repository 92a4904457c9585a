//! Journey statistics and the comparators that rank them.
//!
//! `TransferStats` is the reference stats payload. Comparators are plain
//! values implementing `StatsComparator`; ranking on several criteria is
//! done by composing them, not by overriding.

mod comparator;
mod front;
mod transfer_stats;

pub use comparator::{
    ChainedComparator, Dominance, MinimizeTransfers, MinimizeTravelTime, ParetoCompare,
    ProfileCompare, SharedComparator, StatsComparator,
};
pub use front::ParetoFront;
pub use transfer_stats::TransferStats;
