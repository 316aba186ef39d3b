//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while the
//! CLI uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: fatal errors that abort a whole batch
//! - [`CatalogError`]: per-call failures of the catalog layer; search
//!   failures are absorbed by the matcher and never reach [`Error`]
//! - [`ErrorReport`]: the structured `{kind, message}` result handed to callers
//!
//! [`CatalogError`]: crate::catalog::CatalogError

use std::time::Duration;

use serde::Serialize;

use crate::catalog::CatalogError;

/// Application-wide result type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad credentials or a failed token exchange
    #[error("Authentication with the catalog service failed: {0}")]
    Authentication(String),

    /// The existing-playlist locator does not resolve to an accessible playlist
    #[error("Playlist not found or not accessible: {0}")]
    PlaylistNotFound(String),

    /// Creating, resolving or enumerating the target playlist failed
    #[error("Playlist error: {0}")]
    Playlist(String),

    /// A catalog call failed outside the retry ladder
    #[error("Catalog service error: {0}")]
    Catalog(#[from] CatalogError),

    /// Appending items failed mid-batch
    #[error(
        "Failed to append tracks to playlist {playlist_id} after {appended} were sent \
         (an unknown subset of the batch may have been added): {source}"
    )]
    Append {
        playlist_id: String,
        appended: usize,
        #[source]
        source: CatalogError,
    },

    /// Malformed descriptor batch or playlist target
    #[error("Invalid input: {0}")]
    InputFormat(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The batch ran past its overall deadline
    #[error("Batch did not finish within {0:?}")]
    Timeout(Duration),
}

/// Machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Authentication,
    PlaylistNotFound,
    Playlist,
    CatalogService,
    Append,
    InputFormat,
    Config,
    Io,
    Timeout,
}

/// Structured error result: a kind plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// Create an input format error.
    pub fn input_format(message: impl Into<String>) -> Self {
        Self::InputFormat(message.into())
    }

    /// Create a playlist error.
    pub fn playlist(message: impl Into<String>) -> Self {
        Self::Playlist(message.into())
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication(_) => ErrorKind::Authentication,
            Self::PlaylistNotFound(_) => ErrorKind::PlaylistNotFound,
            Self::Playlist(_) => ErrorKind::Playlist,
            Self::Catalog(_) => ErrorKind::CatalogService,
            Self::Append { .. } => ErrorKind::Append,
            Self::InputFormat(_) => ErrorKind::InputFormat,
            Self::Config(_) => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
            Self::Timeout(_) => ErrorKind::Timeout,
        }
    }

    /// Flatten into the structured result shown to callers.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PlaylistNotFound("https://open.spotify.com/playlist/nope".to_string());
        assert!(err.to_string().contains("playlist/nope"));
    }

    #[test]
    fn test_append_error_mentions_partial_state() {
        let err = Error::Append {
            playlist_id: "pl1".to_string(),
            appended: 100,
            source: CatalogError::Network("connection reset".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("pl1"));
        assert!(msg.contains("unknown subset"));
        assert!(msg.contains("connection reset"));
    }

    #[test]
    fn test_report_kind() {
        let report = Error::input_format("expected a JSON array").report();
        assert_eq!(report.kind, ErrorKind::InputFormat);
        assert!(report.message.contains("expected a JSON array"));
    }

    #[test]
    fn test_report_serializes_snake_case() {
        let report = Error::PlaylistNotFound("x".to_string()).report();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "playlist_not_found");
    }

    #[test]
    fn test_catalog_error_converts() {
        let err: Error = CatalogError::RateLimited.into();
        assert_eq!(err.kind(), ErrorKind::CatalogService);
    }
}
