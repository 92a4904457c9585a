//! Document loader error types.

/// Errors from fetching or parsing a linked-data document.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// The server had nothing at this URI
    #[error("could not open {uri}")]
    NotFound { uri: String },

    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The document was not valid JSON
    #[error("JSON parse error in {uri}: {message}")]
    Json { uri: String, message: String },
}
