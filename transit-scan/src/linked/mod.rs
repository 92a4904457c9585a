//! Linked Connections feeds.
//!
//! Loads JSON-LD connection pages over HTTP and serves them as a
//! [`TimetableProvider`](crate::timetable::TimetableProvider).

mod convert;
mod error;
mod loader;
mod provider;
mod types;

pub use convert::{ConvertedPage, convert_page, convert_record};
pub use error::LoaderError;
pub use loader::{DocumentLoader, LoaderConfig, LoaderStats};
pub use provider::{LinkedConnectionsProvider, LinkedCursor};
pub use types::{ConnectionRecord, ConnectionsPage};
