//! Internal domain models for the catalog layer.
//!
//! These types are OUR types - they don't change when the catalog API changes.
//! All API responses get converted into these types via adapters.

/// Maximum number of items the catalog accepts in one append call.
pub const APPEND_BATCH_SIZE: usize = 100;

/// A playlist on the catalog service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRef {
    /// Catalog playlist ID
    pub id: String,
    /// Public web URL of the playlist
    pub public_url: String,
}

/// One page of a playlist's items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPage {
    /// Track URIs on this page; entries without a URI are already dropped
    pub uris: Vec<String>,
    /// Raw number of entries on the page, used to advance the offset
    pub item_count: usize,
    /// Whether the service reported a following page
    pub has_next: bool,
}

/// Errors from a single catalog call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found")]
    NotFound,

    #[error("Rate limited - try again later")]
    RateLimited,

    #[error("API request failed ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
