//! Spotify Web API HTTP client
//!
//! Handles communication with the Spotify Web API.
//! See: https://developer.spotify.com/documentation/web-api
//!
//! ## API Quirks
//!
//! ### Search syntax
//! Field filters (`track:"..."`, `year:1971`, `isrc:...`) go in the `q`
//! parameter as-is; reqwest's `.query()` does the encoding. `limit=1` asks
//! for the top hit only.
//!
//! ### Tokens
//! Access tokens live for an hour. A batch that outlives one gets a 401; we
//! refresh once from the stored refresh token and replay the request.
//!
//! ### Rate limits
//! 429 responses carry `Retry-After` in seconds. We honour it (capped) a
//! bounded number of times before surfacing [`CatalogError::RateLimited`].

use std::time::Duration;

use futures::stream::BoxStream;
use parking_lot::RwLock;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{RequestBuilder, Response, StatusCode};

use super::{adapter, auth, dto};
use crate::catalog::domain::{APPEND_BATCH_SIZE, CatalogError, PlaylistRef};
use crate::catalog::paging::paged_uris;
use crate::config::{Credentials, HttpConfig};
use crate::error::{Error, Result};

/// Longest `Retry-After` we are willing to sleep through
const MAX_RETRY_AFTER: Duration = Duration::from_secs(30);

/// Fields requested when enumerating playlist items
const ITEM_FIELDS: &str = "items(track(uri)),next";

/// Page size for playlist item enumeration (API maximum)
const ITEMS_PAGE_SIZE: usize = 100;

/// Build the shared HTTP client
///
/// The client is configured to:
/// - Accept gzip-compressed responses
/// - Send a User-Agent header identifying the application
/// - Give up on any single request after the configured timeout
pub fn build_http_client(http: &HttpConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .gzip(true)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .timeout(http.request_timeout())
        .build()
        .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))
}

/// Spotify Web API client for an authenticated user
pub struct SpotifyClient {
    http_client: reqwest::Client,
    api_base_url: String,
    accounts_base_url: String,
    credentials: Credentials,
    access_token: RwLock<String>,
    user_id: String,
    max_rate_limit_retries: u32,
}

impl SpotifyClient {
    /// Authenticate and establish the session's user.
    ///
    /// Uses an explicit access token when one is supplied, otherwise trades
    /// the refresh token for one. Any failure is an authentication error.
    pub async fn connect(credentials: &Credentials, http: &HttpConfig) -> Result<Self> {
        let http_client = build_http_client(http)?;

        let access_token = match (&credentials.access_token, &credentials.refresh_token) {
            (Some(token), _) if !token.is_empty() => token.clone(),
            (_, Some(refresh_token)) if !refresh_token.is_empty() => {
                auth::refresh_access_token(
                    &http_client,
                    &http.accounts_base_url,
                    credentials,
                    refresh_token,
                )
                .await?
                .access_token
            }
            _ => {
                return Err(Error::authentication(
                    "no refresh token configured; run `playlist-porter authorize` first",
                ));
            }
        };

        let mut client = Self {
            http_client,
            api_base_url: http.api_base_url.trim_end_matches('/').to_string(),
            accounts_base_url: http.accounts_base_url.clone(),
            credentials: credentials.clone(),
            access_token: RwLock::new(access_token),
            user_id: String::new(),
            max_rate_limit_retries: http.max_rate_limit_retries,
        };

        let url = format!("{}/me", client.api_base_url);
        let me: dto::CurrentUser = client
            .send_json(|token| client.http_client.get(&url).bearer_auth(token))
            .await
            .map_err(|e| Error::authentication(format!("could not fetch current user: {}", e)))?;

        tracing::info!("Authenticated as Spotify user {}", me.id);
        client.user_id = me.id;
        Ok(client)
    }

    /// ID of the authenticated user
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Top-1 track search
    pub async fn search_track(&self, query: &str) -> Result<Option<String>, CatalogError> {
        let url = format!("{}/search", self.api_base_url);
        let response: dto::SearchResponse = self
            .send_json(|token| {
                self.http_client
                    .get(&url)
                    .bearer_auth(token)
                    .query(&[("q", query), ("type", "track"), ("limit", "1")])
            })
            .await?;
        Ok(adapter::first_track_uri(response))
    }

    /// Create a playlist for `owner_id`
    pub async fn create_playlist(
        &self,
        owner_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<PlaylistRef, CatalogError> {
        let url = format!(
            "{}/users/{}/playlists",
            self.api_base_url,
            urlencoding::encode(owner_id)
        );
        let body = dto::CreatePlaylistRequest {
            name,
            public,
            description,
        };
        let playlist: dto::Playlist = self
            .send_json(|token| self.http_client.post(&url).bearer_auth(token).json(&body))
            .await?;
        Ok(adapter::to_playlist_ref(playlist))
    }

    /// Look up a playlist's id and public URL
    pub async fn get_playlist(&self, playlist_id: &str) -> Result<PlaylistRef, CatalogError> {
        let url = format!(
            "{}/playlists/{}",
            self.api_base_url,
            urlencoding::encode(playlist_id)
        );
        let playlist: dto::Playlist = self
            .send_json(|token| {
                self.http_client
                    .get(&url)
                    .bearer_auth(token)
                    .query(&[("fields", "id,external_urls.spotify")])
            })
            .await?;
        Ok(adapter::to_playlist_ref(playlist))
    }

    /// Lazily enumerate every track URI in a playlist
    pub fn playlist_item_uris<'a>(
        &'a self,
        playlist_id: &'a str,
    ) -> BoxStream<'a, Result<String, CatalogError>> {
        paged_uris(move |offset| async move {
            let page = self.fetch_items_page(playlist_id, offset).await?;
            Ok::<_, CatalogError>(adapter::to_item_page(page))
        })
    }

    async fn fetch_items_page(
        &self,
        playlist_id: &str,
        offset: usize,
    ) -> Result<dto::PlaylistItemsPage, CatalogError> {
        let url = format!(
            "{}/playlists/{}/tracks",
            self.api_base_url,
            urlencoding::encode(playlist_id)
        );
        let offset = offset.to_string();
        let limit = ITEMS_PAGE_SIZE.to_string();
        tracing::debug!("Fetching items of playlist {} at offset {}", playlist_id, offset);
        self.send_json(|token| {
            self.http_client.get(&url).bearer_auth(token).query(&[
                ("fields", ITEM_FIELDS),
                ("limit", limit.as_str()),
                ("offset", offset.as_str()),
                ("additional_types", "track"),
            ])
        })
        .await
    }

    /// Append up to [`APPEND_BATCH_SIZE`] items to a playlist
    pub async fn append_items(&self, playlist_id: &str, uris: &[String]) -> Result<(), CatalogError> {
        if uris.len() > APPEND_BATCH_SIZE {
            return Err(CatalogError::InvalidRequest(format!(
                "cannot append {} items in one call (maximum {})",
                uris.len(),
                APPEND_BATCH_SIZE
            )));
        }
        if uris.is_empty() {
            return Ok(());
        }

        let url = format!(
            "{}/playlists/{}/tracks",
            self.api_base_url,
            urlencoding::encode(playlist_id)
        );
        let body = dto::AddItemsRequest { uris };
        let snapshot: dto::SnapshotResponse = self
            .send_json(|token| self.http_client.post(&url).bearer_auth(token).json(&body))
            .await?;
        tracing::debug!("Playlist {} now at snapshot {}", playlist_id, snapshot.snapshot_id);
        Ok(())
    }

    /// Send a request and decode its JSON body
    async fn send_json<T, F>(&self, build: F) -> Result<T, CatalogError>
    where
        T: serde::de::DeserializeOwned,
        F: Fn(&str) -> RequestBuilder,
    {
        let response = self.send(build).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }

    /// Send a request, refreshing the token on 401 and backing off on 429.
    ///
    /// `build` is called again for every attempt with the current token.
    async fn send<F>(&self, build: F) -> Result<Response, CatalogError>
    where
        F: Fn(&str) -> RequestBuilder,
    {
        let mut refreshed = false;
        let mut rate_limit_retries = 0;

        loop {
            let token = self.access_token.read().clone();
            let response = build(&token).send().await.map_err(transport_error)?;
            let status = response.status();

            if status.is_success() {
                return Ok(response);
            }

            if status == StatusCode::UNAUTHORIZED && !refreshed && self.can_refresh() {
                tracing::debug!("Access token rejected, refreshing");
                self.refresh_access_token().await?;
                refreshed = true;
                continue;
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                if rate_limit_retries >= self.max_rate_limit_retries {
                    return Err(CatalogError::RateLimited);
                }
                let wait = retry_after(response.headers());
                tracing::warn!("Rate limited by Spotify, retrying in {:?}", wait);
                tokio::time::sleep(wait).await;
                rate_limit_retries += 1;
                continue;
            }

            return Err(error_from_response(response).await);
        }
    }

    fn can_refresh(&self) -> bool {
        self.credentials
            .refresh_token
            .as_deref()
            .is_some_and(|t| !t.is_empty())
    }

    async fn refresh_access_token(&self) -> Result<(), CatalogError> {
        let refresh_token = self.credentials.refresh_token.as_deref().unwrap_or_default();
        let grant = auth::refresh_access_token(
            &self.http_client,
            &self.accounts_base_url,
            &self.credentials,
            refresh_token,
        )
        .await
        .map_err(|e| CatalogError::Unauthorized(e.to_string()))?;

        *self.access_token.write() = grant.access_token;
        Ok(())
    }
}

fn transport_error(err: reqwest::Error) -> CatalogError {
    if err.is_timeout() {
        CatalogError::Timeout
    } else {
        CatalogError::Network(err.to_string())
    }
}

/// Delay requested by a 429 response (1s when absent or unparsable)
fn retry_after(headers: &HeaderMap) -> Duration {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(1))
        .min(MAX_RETRY_AFTER)
}

/// Map a non-success response to a catalog error
async fn error_from_response(response: Response) -> CatalogError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    classify_error(status, &body)
}

fn classify_error(status: StatusCode, body: &str) -> CatalogError {
    let message = serde_json::from_str::<dto::ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string()
        });

    match status {
        StatusCode::UNAUTHORIZED => CatalogError::Unauthorized(message),
        StatusCode::NOT_FOUND => CatalogError::NotFound,
        StatusCode::TOO_MANY_REQUESTS => CatalogError::RateLimited,
        _ => CatalogError::Api {
            status: status.as_u16(),
            message,
        },
    }
}
