//! Dominance comparators over journey statistics.
//!
//! A comparator decides whether one stats value is better, worse, equal
//! or incomparable to another. Single-criterion comparators yield a total
//! order; `ChainedComparator` composes several into a lexicographic one;
//! `ProfileCompare` and `ParetoCompare` produce genuine incomparability.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use super::TransferStats;

/// Outcome of comparing stats `a` against stats `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dominance {
    /// `a` is strictly better
    ABetter,
    /// `b` is strictly better
    BBetter,
    /// Neither is better; they perform the same
    Equal,
    /// Each is better in some respect
    Incomparable,
}

impl Dominance {
    /// The verdict with the roles of `a` and `b` swapped.
    pub fn mirror(self) -> Self {
        match self {
            Dominance::ABetter => Dominance::BBetter,
            Dominance::BBetter => Dominance::ABetter,
            other => other,
        }
    }
}

impl From<Ordering> for Dominance {
    /// `Less` means `a` is better, as in "minimise".
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Dominance::ABetter,
            Ordering::Greater => Dominance::BBetter,
            Ordering::Equal => Dominance::Equal,
        }
    }
}

/// Strategy comparing two stats values.
///
/// Implementations must be antisymmetric:
/// `compare(a, b) == compare(b, a).mirror()`.
pub trait StatsComparator<T> {
    fn compare(&self, a: &T, b: &T) -> Dominance;
}

impl<T, C: StatsComparator<T> + ?Sized> StatsComparator<T> for Arc<C> {
    fn compare(&self, a: &T, b: &T) -> Dominance {
        (**self).compare(a, b)
    }
}

impl<T, C: StatsComparator<T> + ?Sized> StatsComparator<T> for &C {
    fn compare(&self, a: &T, b: &T) -> Dominance {
        (**self).compare(a, b)
    }
}

/// A shareable, type-erased comparator.
pub type SharedComparator<T> = Arc<dyn StatsComparator<T> + Send + Sync>;

/// Composes comparators in priority order.
///
/// Returns the verdict of the first comparator that does not say `Equal`.
pub struct ChainedComparator<T> {
    comparators: Vec<SharedComparator<T>>,
}

impl<T> ChainedComparator<T> {
    /// Create a chain from comparators in priority order.
    pub fn new(comparators: Vec<SharedComparator<T>>) -> Self {
        Self { comparators }
    }

    /// Append a lower-priority comparator.
    pub fn then(mut self, comparator: impl StatsComparator<T> + Send + Sync + 'static) -> Self {
        self.comparators.push(Arc::new(comparator));
        self
    }

    /// Returns the number of chained comparators.
    pub fn len(&self) -> usize {
        self.comparators.len()
    }

    /// Returns true if the chain is empty (everything compares equal).
    pub fn is_empty(&self) -> bool {
        self.comparators.is_empty()
    }
}

impl<T> StatsComparator<T> for ChainedComparator<T> {
    fn compare(&self, a: &T, b: &T) -> Dominance {
        self.comparators
            .iter()
            .map(|c| c.compare(a, b))
            .find(|d| *d != Dominance::Equal)
            .unwrap_or(Dominance::Equal)
    }
}

impl<T> fmt::Debug for ChainedComparator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedComparator")
            .field("len", &self.comparators.len())
            .finish()
    }
}

/// Fewer transfers is better.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimizeTransfers;

impl StatsComparator<TransferStats> for MinimizeTransfers {
    fn compare(&self, a: &TransferStats, b: &TransferStats) -> Dominance {
        a.transfers().cmp(&b.transfers()).into()
    }
}

/// Shorter elapsed time (end - start) is better.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimizeTravelTime;

impl StatsComparator<TransferStats> for MinimizeTravelTime {
    fn compare(&self, a: &TransferStats, b: &TransferStats) -> Dominance {
        a.travel_time().cmp(&b.travel_time()).into()
    }
}

/// "Improves in some respect" filter used by profile scans.
///
/// A side leads if it has fewer transfers, a later start, or an earlier
/// arrival. One side leading makes it better; both leading makes them
/// incomparable. This is not a strict Pareto order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileCompare;

impl ProfileCompare {
    fn leads(a: &TransferStats, b: &TransferStats) -> bool {
        a.transfers() < b.transfers() || a.start_time() > b.start_time() || a.end_time() < b.end_time()
    }
}

impl StatsComparator<TransferStats> for ProfileCompare {
    fn compare(&self, a: &TransferStats, b: &TransferStats) -> Dominance {
        if a == b {
            return Dominance::Equal;
        }

        match (Self::leads(a, b), Self::leads(b, a)) {
            (true, true) => Dominance::Incomparable,
            (true, false) => Dominance::ABetter,
            (false, true) => Dominance::BBetter,
            (false, false) => Dominance::Equal,
        }
    }
}

/// Strict dominance on (transfers, travel time).
#[derive(Debug, Clone, Copy, Default)]
pub struct ParetoCompare;

impl ParetoCompare {
    fn dominates(s1: &TransferStats, s2: &TransferStats) -> bool {
        (s1.transfers() < s2.transfers() && s1.travel_time() <= s2.travel_time())
            || (s1.transfers() <= s2.transfers() && s1.travel_time() < s2.travel_time())
    }
}

impl StatsComparator<TransferStats> for ParetoCompare {
    fn compare(&self, a: &TransferStats, b: &TransferStats) -> Dominance {
        if a.transfers() == b.transfers() && a.travel_time() == b.travel_time() {
            return Dominance::Equal;
        }
        if Self::dominates(a, b) {
            return Dominance::ABetter;
        }
        if Self::dominates(b, a) {
            return Dominance::BBetter;
        }
        Dominance::Incomparable
    }
}
