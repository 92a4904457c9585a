//! Domain types for the connection scan.
//!
//! This module contains the data model the scan consumes and builds:
//! identifiers, the three kinds of connection, and the immutable journey
//! chain with its pluggable statistics. Identifiers enforce their
//! invariants at construction time.

mod connection;
mod error;
mod ids;
mod journey;

pub use connection::{
    Connection, InternalTransfer, Ride, TRANSFER_MODE, WALK_MODE, WalkPath, WalkingConnection,
    Waypoint,
};
pub use error::InvalidStats;
pub use ids::{InvalidId, LocationId, OperatorId, RouteId, TripId};
pub use journey::{Iter, Journey, JourneyStats, UNREACHABLE};
