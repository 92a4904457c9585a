//! Timetable provider error types.

use crate::linked::LoaderError;

/// Errors produced while fetching timetable pages.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The document loader could not deliver a page
    #[error(transparent)]
    Loader(#[from] LoaderError),

    /// A page was fetched but its contents could not be used
    #[error("malformed timetable page {page}: {message}")]
    Malformed { page: String, message: String },

    /// A cursor did not come from this provider
    #[error("unknown page cursor: {0}")]
    UnknownCursor(String),
}
