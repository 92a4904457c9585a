//! Earliest-arrival connection scan.
//!
//! Consumes timetable pages in departure order, keeping the best known
//! journey to every location reached so far. Because departures never go
//! backwards, the scan can stop as soon as a connection leaves after the
//! best arrival at a target: nothing later can arrive earlier.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::domain::{Connection, InvalidStats, Journey, JourneyStats, LocationId, UNREACHABLE};
use crate::stats::{Dominance, StatsComparator};
use crate::timetable::{ProviderError, TimetableProvider};

use super::config::ScanConfig;
use super::observer::{ScanObserver, TracingObserver};
use super::profile::Profile;

/// Error from a connection scan.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// No seed journey to start from
    #[error("no seed journey to start from")]
    NoSeedJourney,

    /// The search window closed before a target was settled
    #[error("no journey settled before the deadline {deadline}")]
    Timeout { deadline: DateTime<Utc> },

    /// The timetable ran out before any target was reached
    #[error("no route found")]
    NoRouteFound,

    /// Failed to fetch a timetable page
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Journey statistics could not be built
    #[error(transparent)]
    InvalidStats(#[from] InvalidStats),
}

/// A single earliest-arrival query.
///
/// Scanning borrows the query, so the same query can be run again; with
/// a deterministic timetable every run returns the same journey.
pub struct EarliestConnectionScan<'a, T, P> {
    seeds: Vec<Journey<T>>,
    targets: Vec<LocationId>,
    profile: &'a Profile<T, P>,
    deadline: Option<DateTime<Utc>>,
    max_search: Option<Duration>,
}

impl<'a, T, P> EarliestConnectionScan<'a, T, P>
where
    T: JourneyStats,
    P: TimetableProvider,
{
    /// Create a query from `seeds` to any of `targets`.
    ///
    /// Connections departing after `deadline` are never taken; meeting one
    /// before a target is settled ends the scan with [`ScanError::Timeout`].
    pub fn new(
        seeds: Vec<Journey<T>>,
        targets: Vec<LocationId>,
        profile: &'a Profile<T, P>,
        deadline: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            seeds,
            targets,
            profile,
            deadline,
            max_search: None,
        }
    }

    /// Create a query from one stop at `departure_time` to one target.
    pub fn from_stop(
        departure: LocationId,
        departure_time: DateTime<Utc>,
        target: LocationId,
        profile: &'a Profile<T, P>,
        deadline: Option<DateTime<Utc>>,
    ) -> Result<Self, ScanError> {
        let seed = Journey::seed(departure, departure_time)?;
        Ok(Self::new(vec![seed], vec![target], profile, deadline))
    }

    /// Bound the scan by the configured search window when no explicit
    /// deadline was given.
    pub fn with_config(mut self, config: &ScanConfig) -> Self {
        self.max_search = config.max_search();
        self
    }

    pub fn seeds(&self) -> &[Journey<T>] {
        &self.seeds
    }

    pub fn targets(&self) -> &[LocationId] {
        &self.targets
    }

    /// Earliest seed arrival, where scanning begins.
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.seeds.iter().map(Journey::arrival_time).min()
    }

    /// The deadline in force: the explicit one, else start plus the
    /// search window.
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline.or_else(|| {
            let start = self.start_time()?;
            let window = self.max_search?;
            start.checked_add_signed(window)
        })
    }

    /// Find the earliest-arriving journey to any target, reporting
    /// progress as `tracing` events.
    pub async fn calculate_journey(&self) -> Result<Journey<T>, ScanError> {
        self.calculate_journey_with(&mut TracingObserver).await
    }

    /// Find the earliest-arriving journey to any target, reporting
    /// progress to `observer`.
    pub async fn calculate_journey_with<O>(&self, observer: &mut O) -> Result<Journey<T>, ScanError>
    where
        O: ScanObserver<T>,
    {
        let outcome = self.scan(observer).await;
        observer.on_finished(outcome.as_ref());
        outcome
    }

    async fn scan<O: ScanObserver<T>>(&self, observer: &mut O) -> Result<Journey<T>, ScanError> {
        let start = self.start_time().ok_or(ScanError::NoSeedJourney)?;
        let deadline = self.deadline();

        let mut best: HashMap<LocationId, Journey<T>> = HashMap::new();
        for seed in &self.seeds {
            let known = arrival_at(&best, seed.location());
            if seed.arrival_time() < known {
                best.insert(seed.location().clone(), seed.clone());
            }
        }

        let provider = self.profile.provider();
        let mut page = provider.timetable_at(start).await?;
        let mut index = 0;

        loop {
            observer.on_page(index, page.connections().len());
            let (connections, next) = page.into_parts();

            for connection in connections {
                let departure = connection.expected_departure();

                if let Some(found) = self.best_target(&best) {
                    if departure > found.arrival_time() {
                        return Ok(found.clone());
                    }
                }

                if let Some(deadline) = deadline {
                    if departure > deadline {
                        return Err(ScanError::Timeout { deadline });
                    }
                }

                if let Some(improved) = self.integrate(&best, connection)? {
                    observer.on_improvement(&improved);
                    best.insert(improved.location().clone(), improved);
                }
            }

            match next {
                Some(cursor) => page = provider.next_page(&cursor).await?,
                None => break,
            }
            index += 1;
        }

        self.best_target(&best).cloned().ok_or(ScanError::NoRouteFound)
    }

    /// The journey `connection` would improve, extended by it.
    fn integrate(
        &self,
        best: &HashMap<LocationId, Journey<T>>,
        connection: Connection,
    ) -> Result<Option<Journey<T>>, ScanError> {
        let Some(journey) = best.get(connection.departure_location()) else {
            return Ok(None);
        };

        // Already gone by the time we get there
        if connection.expected_departure() < journey.arrival_time() {
            return Ok(None);
        }

        if !self.profile.can_continue(journey, &connection) {
            return Ok(None);
        }

        if connection.expected_arrival() >= arrival_at(best, connection.arrival_location()) {
            return Ok(None);
        }

        Ok(Some(journey.extend(connection)?))
    }

    /// Earliest journey to any target; ties go to the comparator's pick,
    /// then to the first target listed.
    fn best_target<'b>(&self, best: &'b HashMap<LocationId, Journey<T>>) -> Option<&'b Journey<T>> {
        let comparator = self.profile.comparator();

        self.targets
            .iter()
            .filter_map(|target| best.get(target))
            .reduce(|current, candidate| {
                let earlier = candidate.arrival_time() < current.arrival_time();
                let preferred = candidate.arrival_time() == current.arrival_time()
                    && comparator.compare(candidate.stats(), current.stats()) == Dominance::ABetter;
                if earlier || preferred {
                    candidate
                } else {
                    current
                }
            })
    }
}

fn arrival_at<T>(best: &HashMap<LocationId, Journey<T>>, location: &LocationId) -> DateTime<Utc> {
    best.get(location).map_or(UNREACHABLE, Journey::arrival_time)
}

#[cfg(test)]
#[path = "earliest_tests.rs"]
mod tests;
