//! Scan wiring: timetable, comparator and transfer rules.

use std::fmt;
use std::sync::Arc;

use chrono::Duration;

use crate::domain::{Connection, InternalTransfer, Journey};
use crate::stats::{SharedComparator, StatsComparator};

use super::config::ScanConfig;

/// What has to differ between two rides for a vehicle change to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferIdentity {
    /// Rides on different trips are a change.
    #[default]
    Trip,
    /// Rides on different routes are a change. For feeds that do not
    /// keep trip identifiers stable along a vehicle's run.
    Route,
}

impl TransferIdentity {
    /// Returns true if taking `next` after `journey` means leaving a
    /// vehicle.
    ///
    /// The vehicle is the one last ridden, even if walks or transfers came
    /// after it. A journey that has not ridden anything yet never needs a
    /// change.
    pub fn requires_change<T>(self, journey: &Journey<T>, next: &Connection) -> bool {
        match self {
            TransferIdentity::Trip => match journey.last_trip() {
                Some(trip) => next.trip() != Some(trip),
                None => false,
            },
            TransferIdentity::Route => match journey.last_route() {
                Some(route) => next.route() != Some(route),
                None => false,
            },
        }
    }
}

/// Decides whether a change from one connection to another is possible.
pub trait TransferPolicy {
    /// The transfer needed between `from` and `to`, or `None` if the
    /// change cannot be made.
    fn transfer(&self, from: &Connection, to: &Connection) -> Option<InternalTransfer>;
}

impl<F> TransferPolicy for F
where
    F: Fn(&Connection, &Connection) -> Option<InternalTransfer>,
{
    fn transfer(&self, from: &Connection, to: &Connection) -> Option<InternalTransfer> {
        self(from, to)
    }
}

/// Changes within one location with a fixed minimum dwell.
///
/// Walks and transfers are continuous: changing to or from one needs no
/// dwell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimumTransferTime {
    minimum: Duration,
}

impl MinimumTransferTime {
    pub fn new(minimum: Duration) -> Self {
        Self { minimum }
    }

    pub fn minimum(&self) -> Duration {
        self.minimum
    }
}

impl Default for MinimumTransferTime {
    fn default() -> Self {
        Self::new(Duration::minutes(5))
    }
}

impl TransferPolicy for MinimumTransferTime {
    fn transfer(&self, from: &Connection, to: &Connection) -> Option<InternalTransfer> {
        let location = from.arrival_location();
        if location != to.departure_location() {
            return None;
        }

        let arrival = from.expected_arrival();
        if from.is_continuous() || to.is_continuous() {
            return Some(InternalTransfer::new(location.clone(), arrival, Duration::zero()));
        }

        if to.expected_departure() - arrival < self.minimum {
            return None;
        }
        Some(InternalTransfer::new(location.clone(), arrival, self.minimum))
    }
}

type SharedPolicy = Arc<dyn TransferPolicy + Send + Sync>;

/// Everything a scan needs besides its seeds and targets.
///
/// The statistics type `T` supplies the stats factory through
/// [`JourneyStats`](crate::domain::JourneyStats); `P` is the timetable.
pub struct Profile<T, P> {
    provider: P,
    comparator: SharedComparator<T>,
    policy: SharedPolicy,
    identity: TransferIdentity,
}

impl<T, P> Profile<T, P> {
    /// Create a profile with the default transfer rules.
    pub fn new(provider: P, comparator: impl StatsComparator<T> + Send + Sync + 'static) -> Self {
        Self {
            provider,
            comparator: Arc::new(comparator),
            policy: Arc::new(MinimumTransferTime::default()),
            identity: TransferIdentity::default(),
        }
    }

    /// Create a profile whose transfer rules come from `config`.
    pub fn from_config(
        provider: P,
        comparator: impl StatsComparator<T> + Send + Sync + 'static,
        config: &ScanConfig,
    ) -> Self {
        Self::new(provider, comparator)
            .with_transfer_policy(MinimumTransferTime::new(config.min_transfer()))
            .with_transfer_identity(config.transfer_identity)
    }

    /// Set the transfer feasibility rules.
    pub fn with_transfer_policy(mut self, policy: impl TransferPolicy + Send + Sync + 'static) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Set what counts as staying on the same vehicle.
    pub fn with_transfer_identity(mut self, identity: TransferIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn comparator(&self) -> &SharedComparator<T> {
        &self.comparator
    }

    pub fn transfer_identity(&self) -> TransferIdentity {
        self.identity
    }

    /// Returns true if `next` can be taken at the end of `journey`.
    ///
    /// Staying on the same vehicle is always possible. Anything else is up
    /// to the transfer policy, asked with the journey's last connection.
    pub fn can_continue(&self, journey: &Journey<T>, next: &Connection) -> bool {
        !self.identity.requires_change(journey, next)
            || self.policy.transfer(journey.connection(), next).is_some()
    }
}

impl<T, P: fmt::Debug> fmt::Debug for Profile<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("provider", &self.provider)
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LocationId, OperatorId, Ride, RouteId, TripId, WalkPath, WalkingConnection};
    use crate::stats::{MinimizeTransfers, TransferStats};
    use chrono::{DateTime, TimeZone, Utc};

    fn time(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 10, 30, h, m, 0).unwrap()
    }

    fn loc(s: &str) -> LocationId {
        LocationId::parse(s).unwrap()
    }

    fn ride(
        trip: &str,
        route: &str,
        from: &str,
        to: &str,
        dep: (u32, u32),
        arr: (u32, u32),
    ) -> Connection {
        Ride::new(
            loc(from),
            loc(to),
            time(dep.0, dep.1),
            time(arr.0, arr.1),
            TripId::parse(trip).unwrap(),
            RouteId::parse(route).unwrap(),
            OperatorId::parse("op:1").unwrap(),
            "train",
        )
        .into()
    }

    /// A journey from A at 10:00 taking `connections` in order.
    fn journey(connections: Vec<Connection>) -> Journey<TransferStats> {
        let seed = Journey::seed(loc("A"), time(10, 0)).unwrap();
        connections
            .into_iter()
            .fold(seed, |j, c| j.extend(c).unwrap())
    }

    fn walk(from: &str, to: &str, dep: (u32, u32)) -> Connection {
        WalkingConnection::new(
            loc(from),
            loc(to),
            time(dep.0, dep.1),
            Duration::minutes(4),
            WalkPath::with_distance(300.0),
        )
        .into()
    }

    #[test]
    fn trip_identity() {
        let j = journey(vec![ride("T1", "R1", "A", "B", (10, 0), (10, 10))]);
        let same = ride("T1", "R1", "B", "C", (10, 10), (10, 20));
        let other = ride("T2", "R1", "B", "C", (10, 12), (10, 20));

        assert!(!TransferIdentity::Trip.requires_change(&j, &same));
        assert!(TransferIdentity::Trip.requires_change(&j, &other));
        assert!(!TransferIdentity::Route.requires_change(&j, &other));
    }

    #[test]
    fn seed_never_requires_change() {
        let seed = journey(Vec::new());
        let a = ride("T1", "R1", "A", "B", (10, 0), (10, 10));

        assert!(!TransferIdentity::Trip.requires_change(&seed, &a));
        assert!(!TransferIdentity::Route.requires_change(&seed, &a));
    }

    #[test]
    fn walk_does_not_hide_previous_vehicle() {
        let j = journey(vec![
            ride("T1", "R1", "A", "B", (10, 0), (10, 10)),
            walk("B", "B2", (10, 10)),
        ]);
        let other = ride("T2", "R2", "B2", "C", (10, 20), (10, 30));
        let back_on = ride("T1", "R1", "B2", "C", (10, 20), (10, 30));

        assert!(TransferIdentity::Trip.requires_change(&j, &other));
        assert!(TransferIdentity::Route.requires_change(&j, &other));
        assert!(!TransferIdentity::Trip.requires_change(&j, &back_on));
    }

    #[test]
    fn minimum_transfer_time() {
        let policy = MinimumTransferTime::new(Duration::minutes(5));
        let arrive = ride("T1", "R1", "A", "B", (10, 0), (10, 10));

        let tight = ride("T2", "R2", "B", "C", (10, 14), (10, 30));
        assert!(policy.transfer(&arrive, &tight).is_none());

        let exact = ride("T2", "R2", "B", "C", (10, 15), (10, 30));
        let transfer = policy.transfer(&arrive, &exact).unwrap();
        assert_eq!(transfer.location, loc("B"));
        assert_eq!(transfer.dwell(), Duration::minutes(5));

        let elsewhere = ride("T2", "R2", "X", "C", (10, 30), (10, 40));
        assert!(policy.transfer(&arrive, &elsewhere).is_none());
    }

    #[test]
    fn walks_need_no_dwell() {
        let policy = MinimumTransferTime::default();
        let arrive = ride("T1", "R1", "A", "B", (10, 0), (10, 10));
        assert!(policy.transfer(&arrive, &walk("B", "B2", (10, 10))).is_some());
    }

    #[test]
    fn closures_are_policies() {
        let never = |_: &Connection, _: &Connection| -> Option<InternalTransfer> { None };
        let profile: Profile<TransferStats, ()> =
            Profile::new((), MinimizeTransfers).with_transfer_policy(never);

        let a = journey(vec![ride("T1", "R1", "A", "B", (10, 0), (10, 10))]);
        let same = ride("T1", "R1", "B", "C", (10, 10), (10, 20));
        let other = ride("T2", "R2", "B", "C", (10, 30), (10, 40));

        assert!(profile.can_continue(&a, &same));
        assert!(!profile.can_continue(&a, &other));

        let walked = a.extend(walk("B", "B2", (10, 10))).unwrap();
        let onward = ride("T2", "R2", "B2", "C", (10, 30), (10, 40));
        assert!(!profile.can_continue(&walked, &onward));
    }

    #[test]
    fn from_config_applies_rules() {
        let config = ScanConfig::new(10, TransferIdentity::Route, None);
        let profile: Profile<TransferStats, ()> =
            Profile::from_config((), MinimizeTransfers, &config);

        assert_eq!(profile.transfer_identity(), TransferIdentity::Route);

        let a = journey(vec![ride("T1", "R1", "A", "B", (10, 0), (10, 10))]);
        let new_trip_same_route = ride("T9", "R1", "B", "C", (10, 11), (10, 20));
        let other_route = ride("T2", "R2", "B", "C", (10, 15), (10, 30));

        assert!(profile.can_continue(&a, &new_trip_same_route));
        assert!(!profile.can_continue(&a, &other_route));
    }
}
