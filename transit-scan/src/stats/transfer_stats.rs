//! Reference journey statistics: transfers, travel time and walking.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

use crate::domain::{Connection, InvalidStats, Journey, JourneyStats};

use super::comparator::{ChainedComparator, MinimizeTransfers, MinimizeTravelTime};

/// Number of vehicle changes, start and end time, and distance walked.
///
/// # Invariants
///
/// - `end_time >= start_time`
#[derive(Debug, Clone, PartialEq)]
pub struct TransferStats {
    transfers: u32,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    walking_distance: f32,
}

impl TransferStats {
    /// Construct stats, rejecting an end before the start.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_scan::stats::TransferStats;
    /// use chrono::{Duration, TimeZone, Utc};
    ///
    /// let start = Utc.with_ymd_and_hms(2018, 10, 30, 10, 0, 0).unwrap();
    /// let stats = TransferStats::new(1, start, start + Duration::minutes(40), 0.0).unwrap();
    /// assert_eq!(stats.travel_time(), Duration::minutes(40));
    ///
    /// assert!(TransferStats::new(0, start, start - Duration::minutes(1), 0.0).is_err());
    /// ```
    pub fn new(
        transfers: u32,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        walking_distance: f32,
    ) -> Result<Self, InvalidStats> {
        if end_time < start_time {
            return Err(InvalidStats::ArrivalBeforeDeparture {
                start: start_time,
                end: end_time,
            });
        }
        Ok(Self {
            transfers,
            start_time,
            end_time,
            walking_distance,
        })
    }

    pub fn transfers(&self) -> u32 {
        self.transfers
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    /// Total walked distance in metres.
    pub fn walking_distance(&self) -> f32 {
        self.walking_distance
    }

    /// Elapsed time from start to end.
    pub fn travel_time(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// Fewest transfers first, ties broken by travel time.
    pub fn minimize_transfers_first() -> ChainedComparator<Self> {
        ChainedComparator::new(Vec::new())
            .then(MinimizeTransfers)
            .then(MinimizeTravelTime)
    }

    /// Shortest travel time first, ties broken by transfers.
    pub fn minimize_travel_time_first() -> ChainedComparator<Self> {
        ChainedComparator::new(Vec::new())
            .then(MinimizeTravelTime)
            .then(MinimizeTransfers)
    }
}

impl JourneyStats for TransferStats {
    fn initial(connection: &Connection) -> Result<Self, InvalidStats> {
        // A walk that goes nowhere is a placeholder, not distance covered
        let walk = if connection.is_walk()
            && connection.departure_location() != connection.arrival_location()
        {
            connection.walking_distance()
        } else {
            0.0
        };

        Self::new(
            0,
            connection.expected_departure(),
            connection.expected_arrival(),
            walk,
        )
    }

    fn extend(previous: &Journey<Self>, connection: &Connection) -> Result<Self, InvalidStats> {
        let stats = previous.stats();

        let transferred = match (previous.last_trip(), connection.trip()) {
            (Some(last), Some(next)) => last != next,
            _ => false,
        };

        Self::new(
            stats.transfers + u32::from(transferred),
            stats.start_time.min(connection.expected_departure()),
            stats.end_time.max(connection.expected_arrival()),
            stats.walking_distance + connection.walking_distance(),
        )
    }
}

impl fmt::Display for TransferStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mins = self.travel_time().num_minutes();
        write!(
            f,
            "{} transfers, {}h{:02}m, {:.0}m to walk",
            self.transfers,
            mins / 60,
            mins % 60,
            self.walking_distance
        )
    }
}
