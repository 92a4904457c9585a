//! Non-dominated sets of journeys.

use crate::domain::Journey;

use super::comparator::{Dominance, StatsComparator};

/// A set of journeys of which none is better than another.
///
/// Candidates that an existing member beats or equals are rejected;
/// members the candidate beats are evicted.
pub struct ParetoFront<T> {
    journeys: Vec<Journey<T>>,
}

impl<T> Default for ParetoFront<T> {
    fn default() -> Self {
        Self {
            journeys: Vec::new(),
        }
    }
}

impl<T> ParetoFront<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.journeys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.journeys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Journey<T>> {
        self.journeys.iter()
    }

    pub fn into_vec(self) -> Vec<Journey<T>> {
        self.journeys
    }

    /// Returns true if some member is at least as good as `stats`.
    pub fn dominates<C: StatsComparator<T>>(&self, stats: &T, comparator: &C) -> bool {
        self.journeys.iter().any(|member| {
            matches!(
                comparator.compare(member.stats(), stats),
                Dominance::ABetter | Dominance::Equal
            )
        })
    }

    /// Insert `journey` unless it is dominated. Returns whether it was kept.
    pub fn add<C: StatsComparator<T>>(&mut self, journey: Journey<T>, comparator: &C) -> bool {
        if self.dominates(journey.stats(), comparator) {
            return false;
        }

        self.journeys.retain(|member| {
            comparator.compare(journey.stats(), member.stats()) != Dominance::ABetter
        });
        self.journeys.push(journey);
        true
    }
}
