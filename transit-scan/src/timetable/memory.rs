//! Fixed timetable held in memory.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};

use crate::domain::Connection;

use super::{ProviderError, TimetablePage, TimetableProvider};

/// Default number of connections per page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// A provider over a fixed list of connections.
///
/// Connections are sorted by expected departure at construction (stable, so
/// equal departures keep their input order) and served in pages of
/// `page_size`. The cursor is the offset of the next page.
///
/// # Examples
///
/// ```
/// use transit_scan::timetable::{InMemoryTimetable, TimetableProvider};
/// use chrono::{TimeZone, Utc};
///
/// # futures::executor::block_on(async {
/// let timetable = InMemoryTimetable::new(Vec::new());
/// let page = timetable
///     .timetable_at(Utc.with_ymd_and_hms(2018, 10, 30, 10, 0, 0).unwrap())
///     .await
///     .unwrap();
/// assert!(page.connections().is_empty());
/// assert!(page.is_last());
/// # });
/// ```
#[derive(Debug)]
pub struct InMemoryTimetable {
    connections: Vec<Connection>,
    page_size: usize,
    fetches: AtomicUsize,
}

impl InMemoryTimetable {
    /// Create a timetable served in pages of [`DEFAULT_PAGE_SIZE`].
    pub fn new(connections: Vec<Connection>) -> Self {
        Self::with_page_size(connections, DEFAULT_PAGE_SIZE)
    }

    /// Create a timetable served in pages of `page_size` (at least one).
    pub fn with_page_size(mut connections: Vec<Connection>, page_size: usize) -> Self {
        connections.sort_by_key(Connection::expected_departure);
        Self {
            connections,
            page_size: page_size.max(1),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    fn page_from(&self, offset: usize) -> TimetablePage<usize> {
        self.fetches.fetch_add(1, Ordering::Relaxed);

        let end = (offset + self.page_size).min(self.connections.len());
        let next = (end < self.connections.len()).then_some(end);
        TimetablePage::new(self.connections[offset..end].to_vec(), next)
    }
}

impl TimetableProvider for InMemoryTimetable {
    type Cursor = usize;

    async fn timetable_at(
        &self,
        time: DateTime<Utc>,
    ) -> Result<TimetablePage<usize>, ProviderError> {
        let start = self
            .connections
            .partition_point(|c| c.expected_departure() < time);
        Ok(self.page_from(start))
    }

    async fn next_page(&self, cursor: &usize) -> Result<TimetablePage<usize>, ProviderError> {
        if *cursor > self.connections.len() {
            return Err(ProviderError::UnknownCursor(cursor.to_string()));
        }
        Ok(self.page_from(*cursor))
    }
}
