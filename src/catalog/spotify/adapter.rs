//! Adapter layer: Convert Spotify DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.

use super::dto;
use crate::catalog::domain::{ItemPage, PlaylistRef};

const PUBLIC_PLAYLIST_BASE: &str = "https://open.spotify.com/playlist";

/// URI of the first track in a search response, if any
pub fn first_track_uri(response: dto::SearchResponse) -> Option<String> {
    response
        .tracks
        .and_then(|tracks| tracks.items.into_iter().next())
        .map(|track| track.uri)
        .filter(|uri| !uri.is_empty())
}

/// Convert a playlist object, synthesizing the public URL when it is missing
pub fn to_playlist_ref(playlist: dto::Playlist) -> PlaylistRef {
    let public_url = playlist
        .external_urls
        .and_then(|urls| urls.spotify)
        .unwrap_or_else(|| format!("{}/{}", PUBLIC_PLAYLIST_BASE, playlist.id));

    PlaylistRef {
        id: playlist.id,
        public_url,
    }
}

/// Convert one items page, dropping entries that carry no track URI
pub fn to_item_page(page: dto::PlaylistItemsPage) -> ItemPage {
    let item_count = page.items.len();
    let uris = page
        .items
        .into_iter()
        .flatten()
        .filter_map(|item| item.track)
        .filter_map(|track| track.uri)
        .collect();

    ItemPage {
        uris,
        item_count,
        has_next: page.next.is_some(),
    }
}

/// Human-readable message from an accounts-service error body
pub fn auth_error_message(error: dto::AuthErrorResponse) -> String {
    match error.error_description {
        Some(description) => format!("{}: {}", error.error, description),
        None => error.error,
    }
}
