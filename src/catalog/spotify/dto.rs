//! Spotify Web API Data Transfer Objects
//!
//! These types match what the Spotify Web API returns for the endpoints we
//! call, restricted to the fields we request or read.
//! DO NOT use these types outside the spotify module - convert to domain types.
//!
//! API Reference: https://developer.spotify.com/documentation/web-api
//!
//! Example search response (`GET /search?type=track&limit=1`):
//! ```json
//! {
//!   "tracks": {
//!     "href": "https://api.spotify.com/v1/search?...",
//!     "items": [{"id": "7pKfPomDEeI4TPT6EOYjn9", "name": "Imagine",
//!                "uri": "spotify:track:7pKfPomDEeI4TPT6EOYjn9"}],
//!     "limit": 1, "next": "...", "offset": 0, "total": 812
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Response of `GET /search`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    /// Present when `type=track` was requested
    pub tracks: Option<Paging<Track>>,
}

/// Generic paging object
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub next: Option<String>,
    pub offset: Option<u32>,
    pub total: Option<u32>,
}

/// Simplified track object
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: Option<String>,
    pub uri: String,
}

/// Response of `GET /me`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CurrentUser {
    pub id: String,
    pub display_name: Option<String>,
}

/// Playlist object, as returned by create and (field-filtered) lookup
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Playlist {
    pub id: String,
    pub name: Option<String>,
    pub external_urls: Option<ExternalUrls>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

/// Body of `POST /users/{user_id}/playlists`
#[derive(Debug, Clone, Serialize)]
pub struct CreatePlaylistRequest<'a> {
    pub name: &'a str,
    pub public: bool,
    pub description: &'a str,
}

/// Response of `GET /playlists/{id}/tracks?fields=items(track(uri)),next`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistItemsPage {
    /// Entries may be null, and so may their track (removed or local items)
    #[serde(default)]
    pub items: Vec<Option<PlaylistItem>>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistItem {
    pub track: Option<ItemTrack>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemTrack {
    pub uri: Option<String>,
}

/// Body of `POST /playlists/{id}/tracks`
#[derive(Debug, Clone, Serialize)]
pub struct AddItemsRequest<'a> {
    pub uris: &'a [String],
}

/// Response of `POST /playlists/{id}/tracks`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}

/// Regular API error body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

/// Response of `POST /api/token` on the accounts service
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: u64,
    /// Only sent for the authorization-code grant (and sometimes on refresh)
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
}

/// Error body of the accounts service (OAuth style, not the API style)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthErrorResponse {
    pub error: String,
    pub error_description: Option<String>,
}
