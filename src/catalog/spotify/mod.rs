//! Spotify Web API integration
//!
//! The production [`CatalogService`](crate::catalog::CatalogService): track
//! search, playlist creation and lookup, item enumeration and appends.
//! API docs: https://developer.spotify.com/documentation/web-api

mod adapter;
pub mod auth;
mod client;
pub mod dto;

pub use auth::{TokenGrant, authorize_url, exchange_code, extract_authorization_code};
pub use client::{SpotifyClient, build_http_client};
