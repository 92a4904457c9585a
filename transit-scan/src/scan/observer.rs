//! Diagnostics sink for scans.
//!
//! The scan reports what it does through a [`ScanObserver`] handed in by
//! the caller instead of logging on its own.

use tracing::{debug, trace};

use crate::domain::Journey;

use super::earliest::ScanError;

/// Receives scan events. Every method defaults to doing nothing.
pub trait ScanObserver<T> {
    /// A timetable page with `connections` connections was fetched.
    /// `page` counts from zero.
    fn on_page(&mut self, page: usize, connections: usize) {
        let _ = (page, connections);
    }

    /// `journey` is the new best way to reach `journey.location()`.
    fn on_improvement(&mut self, journey: &Journey<T>) {
        let _ = journey;
    }

    /// The scan ended.
    fn on_finished(&mut self, outcome: Result<&Journey<T>, &ScanError>) {
        let _ = outcome;
    }
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl<T> ScanObserver<T> for NoopObserver {}

/// Forwards scan events as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl<T> ScanObserver<T> for TracingObserver {
    fn on_page(&mut self, page: usize, connections: usize) {
        debug!(page, connections, "scanning timetable page");
    }

    fn on_improvement(&mut self, journey: &Journey<T>) {
        trace!(
            location = %journey.location(),
            arrival = %journey.arrival_time(),
            connections = journey.len(),
            "improved journey"
        );
    }

    fn on_finished(&mut self, outcome: Result<&Journey<T>, &ScanError>) {
        match outcome {
            Ok(journey) => debug!(
                target_location = %journey.location(),
                arrival = %journey.arrival_time(),
                "scan finished"
            ),
            Err(e) => debug!(error = %e, "scan failed"),
        }
    }
}

/// Counts what a scan did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Timetable pages fetched
    pub pages: usize,
    /// Connections on those pages
    pub connections: usize,
    /// Times a location got a better journey
    pub improvements: usize,
    /// Whether the scan produced a journey
    pub found: bool,
}

impl<T> ScanObserver<T> for ScanSummary {
    fn on_page(&mut self, _page: usize, connections: usize) {
        self.pages += 1;
        self.connections += connections;
    }

    fn on_improvement(&mut self, _journey: &Journey<T>) {
        self.improvements += 1;
    }

    fn on_finished(&mut self, outcome: Result<&Journey<T>, &ScanError>) {
        self.found = outcome.is_ok();
    }
}
