//! Journey types.
//!
//! A `Journey` is a backward-linked chain of connections ending at the
//! location it reaches. Nodes are immutable and shared: extending a
//! journey allocates one node and points it at the existing chain, so
//! partial results that branch from a common prefix never copy it.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use super::{Connection, InternalTransfer, InvalidStats, LocationId, RouteId, TripId};

/// Arrival time of a location that has not been reached yet.
pub const UNREACHABLE: DateTime<Utc> = DateTime::<Utc>::MAX_UTC;

/// Statistics accumulated along a journey.
///
/// Both operations are pure: they never touch the previous value and
/// return a fresh one.
pub trait JourneyStats: Sized {
    /// Stats for a journey consisting of the single seed `connection`.
    fn initial(connection: &Connection) -> Result<Self, InvalidStats>;

    /// Stats for `previous` extended by `connection`.
    fn extend(previous: &Journey<Self>, connection: &Connection) -> Result<Self, InvalidStats>;
}

struct Node<T> {
    previous: Option<Journey<T>>,
    connection: Connection,
    stats: T,
}

/// A shared handle to an immutable journey node.
///
/// Cloning is cheap (reference count increment).
pub struct Journey<T> {
    node: Arc<Node<T>>,
}

impl<T> Clone for Journey<T> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
        }
    }
}

impl<T: JourneyStats> Journey<T> {
    /// A journey representing a traveller already standing at `location`
    /// at `time`.
    ///
    /// The seed connection is a zero-duration internal transfer.
    pub fn seed(location: LocationId, time: DateTime<Utc>) -> Result<Self, InvalidStats> {
        Self::from_connection(InternalTransfer::new(location, time, Duration::zero()).into())
    }

    /// A journey consisting of one connection, e.g. a walk from an
    /// address to a nearby stop.
    pub fn from_connection(connection: Connection) -> Result<Self, InvalidStats> {
        let stats = T::initial(&connection)?;
        Ok(Self {
            node: Arc::new(Node {
                previous: None,
                connection,
                stats,
            }),
        })
    }

    /// Returns a new journey that takes `connection` after this one.
    ///
    /// `self` is left untouched and becomes the shared tail of the result.
    pub fn extend(&self, connection: Connection) -> Result<Self, InvalidStats> {
        let stats = T::extend(self, &connection)?;
        Ok(Self {
            node: Arc::new(Node {
                previous: Some(self.clone()),
                connection,
                stats,
            }),
        })
    }
}

impl<T> Journey<T> {
    /// Returns the journey this one extends, `None` for a seed.
    pub fn previous(&self) -> Option<&Journey<T>> {
        self.node.previous.as_ref()
    }

    /// Returns the last connection taken.
    pub fn connection(&self) -> &Connection {
        &self.node.connection
    }

    /// Returns the accumulated statistics.
    pub fn stats(&self) -> &T {
        &self.node.stats
    }

    /// Returns true if this journey has no previous link.
    pub fn is_seed(&self) -> bool {
        self.node.previous.is_none()
    }

    /// Returns the location reached.
    pub fn location(&self) -> &LocationId {
        self.node.connection.arrival_location()
    }

    /// Returns the location the journey starts from.
    pub fn origin(&self) -> &LocationId {
        self.root().connection().departure_location()
    }

    /// Returns the expected arrival time at `location()`.
    pub fn arrival_time(&self) -> DateTime<Utc> {
        self.node.connection.expected_arrival()
    }

    /// Returns the expected departure time of the first connection.
    pub fn departure_time(&self) -> DateTime<Utc> {
        self.root().connection().expected_departure()
    }

    /// Returns the trip of the most recent ride, skipping walks and
    /// transfers. `None` if no vehicle has been taken yet.
    pub fn last_trip(&self) -> Option<&TripId> {
        self.iter().find_map(|j| j.connection().trip())
    }

    /// Returns the route of the most recent ride, skipping walks and
    /// transfers.
    pub fn last_route(&self) -> Option<&RouteId> {
        self.iter().find_map(|j| j.connection().route())
    }

    /// Returns the number of connections, including the seed.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Always false: a journey holds at least its seed connection.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates over the chain from this node back to the seed.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { next: Some(self) }
    }

    /// Returns the connections in chronological order.
    pub fn connections(&self) -> Vec<&Connection> {
        let mut connections: Vec<&Connection> = self.iter().map(|j| j.connection()).collect();
        connections.reverse();
        connections
    }

    /// Returns true if both journeys share at least one node.
    pub fn shares_tail_with(&self, other: &Journey<T>) -> bool {
        self.iter()
            .any(|a| other.iter().any(|b| Arc::ptr_eq(&a.node, &b.node)))
    }

    fn root(&self) -> &Journey<T> {
        let mut current = self;
        while let Some(previous) = current.previous() {
            current = previous;
        }
        current
    }
}

/// Iterator over a journey chain, newest node first.
pub struct Iter<'a, T> {
    next: Option<&'a Journey<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a Journey<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.previous();
        Some(current)
    }
}

impl<T: PartialEq> PartialEq for Journey<T> {
    fn eq(&self, other: &Self) -> bool {
        let mut a = self.iter();
        let mut b = other.iter();
        loop {
            match (a.next(), b.next()) {
                (None, None) => return true,
                (Some(x), Some(y)) => {
                    if Arc::ptr_eq(&x.node, &y.node) {
                        return true;
                    }
                    if x.connection() != y.connection() || x.stats() != y.stats() {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Journey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Journey")
            .field("location", self.location())
            .field("arrival", &self.arrival_time())
            .field("stats", self.stats())
            .field("connections", &self.connections())
            .finish()
    }
}

impl<T: fmt::Display> fmt::Display for Journey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Journey to {} ({})", self.location(), self.stats())?;
        for connection in self.connections() {
            writeln!(f, "  {connection}")?;
        }
        Ok(())
    }
}
