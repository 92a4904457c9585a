//! Timetable stream contract.
//!
//! The scan never holds a whole timetable. It asks a provider for the page
//! of connections departing from some moment on, then follows the page's
//! continuation cursor. Providers must deliver connections in
//! non-decreasing expected departure order across the whole page chain;
//! the scan's early termination relies on it and does not re-sort.

mod error;
mod memory;
mod merge;

use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::Connection;

pub use error::ProviderError;
pub use memory::InMemoryTimetable;
pub use merge::{MergedCursor, MergedTimetable};

/// A bounded, chronologically ordered batch of connections.
#[derive(Debug, Clone)]
pub struct TimetablePage<C> {
    connections: Vec<Connection>,
    next: Option<C>,
}

impl<C> TimetablePage<C> {
    /// Create a page. `next` is `None` when the stream is exhausted.
    pub fn new(connections: Vec<Connection>, next: Option<C>) -> Self {
        Self { connections, next }
    }

    /// Returns the connections on this page.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Returns the cursor of the following page, if any.
    pub fn continuation(&self) -> Option<&C> {
        self.next.as_ref()
    }

    /// Returns true if no page follows this one.
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }

    /// Splits the page into its connections and continuation.
    pub fn into_parts(self) -> (Vec<Connection>, Option<C>) {
        (self.connections, self.next)
    }
}

/// Source of timetable pages.
///
/// This abstraction lets the scan run over a live Linked Connections feed
/// as well as fixed in-memory data in tests.
#[allow(async_fn_in_trait)]
pub trait TimetableProvider {
    /// Opaque continuation handed back to `next_page`.
    type Cursor: Clone + fmt::Debug;

    /// Get the page of connections departing at or after `time`.
    async fn timetable_at(
        &self,
        time: DateTime<Utc>,
    ) -> Result<TimetablePage<Self::Cursor>, ProviderError>;

    /// Get the page following the one that produced `cursor`.
    async fn next_page(
        &self,
        cursor: &Self::Cursor,
    ) -> Result<TimetablePage<Self::Cursor>, ProviderError>;
}
