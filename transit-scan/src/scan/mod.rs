//! Earliest-arrival connection scan.
//!
//! A scan takes seed journeys, a set of acceptable targets and a
//! [`Profile`] bundling the timetable with the transfer rules, and returns
//! the journey reaching any target first.

mod config;
mod earliest;
mod observer;
mod profile;

pub use config::ScanConfig;
pub use earliest::{EarliestConnectionScan, ScanError};
pub use observer::{NoopObserver, ScanObserver, ScanSummary, TracingObserver};
pub use profile::{MinimumTransferTime, Profile, TransferIdentity, TransferPolicy};
