//! Connection types.
//!
//! A connection is one atomic movement opportunity: a vehicle ride between
//! two consecutive stops, a platform change inside a station, or a walk.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

use super::{LocationId, OperatorId, RouteId, TripId};

/// Mode label used for internal transfers.
pub const TRANSFER_MODE: &str = "transfer";

/// Mode label used for walking connections.
pub const WALK_MODE: &str = "walk";

/// One hop of a scheduled vehicle between two consecutive stops.
#[derive(Debug, Clone, PartialEq)]
pub struct Ride {
    pub departure_location: LocationId,
    pub arrival_location: LocationId,
    /// Scheduled departure time
    pub departure_time: DateTime<Utc>,
    /// Scheduled arrival time
    pub arrival_time: DateTime<Utc>,
    /// Realtime offset on the departure (zero when on time)
    pub departure_delay: Duration,
    /// Realtime offset on the arrival (zero when on time)
    pub arrival_delay: Duration,
    pub trip: TripId,
    pub route: RouteId,
    pub operator: OperatorId,
    /// Free-form mode label, e.g. "train" or "bus"
    pub mode: String,
}

impl Ride {
    /// Creates an on-time ride.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        departure_location: LocationId,
        arrival_location: LocationId,
        departure_time: DateTime<Utc>,
        arrival_time: DateTime<Utc>,
        trip: TripId,
        route: RouteId,
        operator: OperatorId,
        mode: impl Into<String>,
    ) -> Self {
        Self {
            departure_location,
            arrival_location,
            departure_time,
            arrival_time,
            departure_delay: Duration::zero(),
            arrival_delay: Duration::zero(),
            trip,
            route,
            operator,
            mode: mode.into(),
        }
    }

    /// Attach realtime delays.
    pub fn with_delays(mut self, departure_delay: Duration, arrival_delay: Duration) -> Self {
        self.departure_delay = departure_delay;
        self.arrival_delay = arrival_delay;
        self
    }
}

/// A change of platform without leaving the station.
///
/// Both ends are the same location; the duration is a fixed dwell.
#[derive(Debug, Clone, PartialEq)]
pub struct InternalTransfer {
    pub location: LocationId,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub operator: Option<OperatorId>,
}

impl InternalTransfer {
    /// Creates a transfer at `location` starting at `departure_time`
    /// and lasting `dwell`.
    pub fn new(location: LocationId, departure_time: DateTime<Utc>, dwell: Duration) -> Self {
        Self {
            location,
            departure_time,
            arrival_time: departure_time + dwell,
            operator: None,
        }
    }

    /// Sets the operator responsible for the station.
    pub fn with_operator(mut self, operator: OperatorId) -> Self {
        self.operator = Some(operator);
        self
    }

    /// Returns the dwell time of this transfer.
    pub fn dwell(&self) -> Duration {
        self.arrival_time - self.departure_time
    }
}

/// A point along a walking path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub lat: f64,
    pub lon: f64,
}

/// Geometry of a walk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalkPath {
    /// Total distance in metres
    pub total_distance: f32,
    /// Optional polyline; empty when only the distance is known
    pub waypoints: Vec<Waypoint>,
}

impl WalkPath {
    /// A path of which only the length is known.
    pub fn with_distance(total_distance: f32) -> Self {
        Self {
            total_distance,
            waypoints: Vec::new(),
        }
    }
}

/// A walk between two locations.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkingConnection {
    pub departure_location: LocationId,
    pub arrival_location: LocationId,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub path: WalkPath,
    pub operator: Option<OperatorId>,
}

impl WalkingConnection {
    /// Creates a walk leaving at `departure_time` and taking `duration`.
    pub fn new(
        departure_location: LocationId,
        arrival_location: LocationId,
        departure_time: DateTime<Utc>,
        duration: Duration,
        path: WalkPath,
    ) -> Self {
        Self {
            departure_location,
            arrival_location,
            departure_time,
            arrival_time: departure_time + duration,
            path,
            operator: None,
        }
    }
}

/// A single movement opportunity consumed by the scan.
///
/// Upstream feeds guarantee `expected_arrival() >= expected_departure()`;
/// this is not re-checked here.
#[derive(Debug, Clone, PartialEq)]
pub enum Connection {
    /// A scheduled vehicle ride
    Ride(Ride),
    /// A platform change inside one station
    Transfer(InternalTransfer),
    /// A walk between locations
    Walk(WalkingConnection),
}

impl Connection {
    /// Returns the location this connection leaves from.
    pub fn departure_location(&self) -> &LocationId {
        match self {
            Connection::Ride(ride) => &ride.departure_location,
            Connection::Transfer(transfer) => &transfer.location,
            Connection::Walk(walk) => &walk.departure_location,
        }
    }

    /// Returns the location this connection arrives at.
    pub fn arrival_location(&self) -> &LocationId {
        match self {
            Connection::Ride(ride) => &ride.arrival_location,
            Connection::Transfer(transfer) => &transfer.location,
            Connection::Walk(walk) => &walk.arrival_location,
        }
    }

    /// Returns the scheduled departure time.
    pub fn departure_time(&self) -> DateTime<Utc> {
        match self {
            Connection::Ride(ride) => ride.departure_time,
            Connection::Transfer(transfer) => transfer.departure_time,
            Connection::Walk(walk) => walk.departure_time,
        }
    }

    /// Returns the scheduled arrival time.
    pub fn arrival_time(&self) -> DateTime<Utc> {
        match self {
            Connection::Ride(ride) => ride.arrival_time,
            Connection::Transfer(transfer) => transfer.arrival_time,
            Connection::Walk(walk) => walk.arrival_time,
        }
    }

    /// Returns the departure delay (zero for transfers and walks).
    pub fn departure_delay(&self) -> Duration {
        match self {
            Connection::Ride(ride) => ride.departure_delay,
            Connection::Transfer(_) | Connection::Walk(_) => Duration::zero(),
        }
    }

    /// Returns the arrival delay (zero for transfers and walks).
    pub fn arrival_delay(&self) -> Duration {
        match self {
            Connection::Ride(ride) => ride.arrival_delay,
            Connection::Transfer(_) | Connection::Walk(_) => Duration::zero(),
        }
    }

    /// Returns the departure time including delay.
    pub fn expected_departure(&self) -> DateTime<Utc> {
        self.departure_time() + self.departure_delay()
    }

    /// Returns the arrival time including delay.
    pub fn expected_arrival(&self) -> DateTime<Utc> {
        self.arrival_time() + self.arrival_delay()
    }

    /// Returns the expected duration of this connection.
    pub fn duration(&self) -> Duration {
        self.expected_arrival() - self.expected_departure()
    }

    /// Returns the trip, if this is a ride.
    pub fn trip(&self) -> Option<&TripId> {
        match self {
            Connection::Ride(ride) => Some(&ride.trip),
            Connection::Transfer(_) | Connection::Walk(_) => None,
        }
    }

    /// Returns the route, if this is a ride.
    pub fn route(&self) -> Option<&RouteId> {
        match self {
            Connection::Ride(ride) => Some(&ride.route),
            Connection::Transfer(_) | Connection::Walk(_) => None,
        }
    }

    /// Returns the operator, if known.
    pub fn operator(&self) -> Option<&OperatorId> {
        match self {
            Connection::Ride(ride) => Some(&ride.operator),
            Connection::Transfer(transfer) => transfer.operator.as_ref(),
            Connection::Walk(walk) => walk.operator.as_ref(),
        }
    }

    /// Returns the mode label.
    pub fn mode(&self) -> &str {
        match self {
            Connection::Ride(ride) => &ride.mode,
            Connection::Transfer(_) => TRANSFER_MODE,
            Connection::Walk(_) => WALK_MODE,
        }
    }

    /// Returns true if the connection can be taken at any moment rather
    /// than at a scheduled time.
    pub fn is_continuous(&self) -> bool {
        !matches!(self, Connection::Ride(_))
    }

    /// Returns the walked distance in metres (zero unless this is a walk).
    pub fn walking_distance(&self) -> f32 {
        match self {
            Connection::Walk(walk) => walk.path.total_distance,
            Connection::Ride(_) | Connection::Transfer(_) => 0.0,
        }
    }

    /// Returns true if this is a vehicle ride.
    pub fn is_ride(&self) -> bool {
        matches!(self, Connection::Ride(_))
    }

    /// Returns true if this is an internal transfer.
    pub fn is_transfer(&self) -> bool {
        matches!(self, Connection::Transfer(_))
    }

    /// Returns true if this is a walk.
    pub fn is_walk(&self) -> bool {
        matches!(self, Connection::Walk(_))
    }
}

impl From<Ride> for Connection {
    fn from(ride: Ride) -> Self {
        Connection::Ride(ride)
    }
}

impl From<InternalTransfer> for Connection {
    fn from(transfer: InternalTransfer) -> Self {
        Connection::Transfer(transfer)
    }
}

impl From<WalkingConnection> for Connection {
    fn from(walk: WalkingConnection) -> Self {
        Connection::Walk(walk)
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dep = self.expected_departure().format("%H:%M");
        let arr = self.expected_arrival().format("%H:%M");
        match self {
            Connection::Ride(ride) => write!(
                f,
                "{} {} {dep} --> {} {arr}",
                ride.trip, ride.departure_location, ride.arrival_location
            ),
            Connection::Transfer(transfer) => {
                write!(f, "Transfer in {} {dep} --> {arr}", transfer.location)
            }
            Connection::Walk(walk) => write!(
                f,
                "Walk {:.0}m {} {dep} --> {} {arr}",
                walk.path.total_distance, walk.departure_location, walk.arrival_location
            ),
        }
    }
}
