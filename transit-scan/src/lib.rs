//! Earliest-arrival journey planning over streamed timetables.
//!
//! The timetable is never loaded whole: a [`timetable::TimetableProvider`]
//! hands out chronologically ordered pages of connections, and the
//! [`scan::EarliestConnectionScan`] consumes them until the best journey
//! to a target can no longer improve.
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use transit_scan::domain::{Connection, LocationId, OperatorId, Ride, RouteId, TripId};
//! use transit_scan::scan::{EarliestConnectionScan, Profile};
//! use transit_scan::stats::TransferStats;
//! use transit_scan::timetable::InMemoryTimetable;
//!
//! let at = |h, m| Utc.with_ymd_and_hms(2018, 10, 30, h, m, 0).unwrap();
//! let stop = |s| LocationId::parse(s).unwrap();
//! let ride = |from, to, dep, arr| -> Connection {
//!     Ride::new(
//!         stop(from),
//!         stop(to),
//!         dep,
//!         arr,
//!         TripId::parse("IC1831").unwrap(),
//!         RouteId::parse("IC").unwrap(),
//!         OperatorId::parse("sncb").unwrap(),
//!         "train",
//!     )
//!     .into()
//! };
//!
//! let timetable = InMemoryTimetable::new(vec![
//!     ride("Brugge", "Gent", at(10, 5), at(10, 20)),
//!     ride("Gent", "Brussel", at(10, 20), at(10, 40)),
//! ]);
//! let profile = Profile::new(timetable, TransferStats::minimize_transfers_first());
//!
//! let scan = EarliestConnectionScan::from_stop(
//!     stop("Brugge"),
//!     at(10, 0),
//!     stop("Brussel"),
//!     &profile,
//!     None,
//! )
//! .unwrap();
//! let journey = futures::executor::block_on(scan.calculate_journey()).unwrap();
//!
//! assert_eq!(journey.arrival_time(), at(10, 40));
//! assert_eq!(journey.stats().transfers(), 0);
//! ```

pub mod domain;
pub mod linked;
pub mod scan;
pub mod stats;
pub mod timetable;
