//! The catalog service capability.
//!
//! This trait enables dependency injection and mocking for tests.
//! Production code uses [`SpotifyClient`], while tests substitute
//! [`mocks::MockCatalog`] with canned responses.
//!
//! # Example
//!
//! ```ignore
//! use playlist_porter::catalog::CatalogService;
//!
//! async fn first_hit<C: CatalogService + ?Sized>(catalog: &C) -> Option<String> {
//!     catalog.search_track(r#"track:"Imagine""#).await.ok().flatten()
//! }
//! ```
//!
//! [`SpotifyClient`]: super::spotify::SpotifyClient

use async_trait::async_trait;
use futures::stream::BoxStream;

use super::domain::{CatalogError, PlaylistRef};

/// Operations the importer needs from a music catalog.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Top-1 track search. Returns the URI of the first hit, if any.
    async fn search_track(&self, query: &str) -> Result<Option<String>, CatalogError>;

    /// ID of the authenticated user, established once per session.
    async fn current_user_id(&self) -> Result<String, CatalogError>;

    /// Create a playlist owned by `owner_id`.
    async fn create_playlist(
        &self,
        owner_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<PlaylistRef, CatalogError>;

    /// Look up a playlist; [`CatalogError::NotFound`] if it does not exist
    /// or is not accessible.
    async fn get_playlist(&self, playlist_id: &str) -> Result<PlaylistRef, CatalogError>;

    /// Every track URI currently in the playlist, fetched lazily page by page.
    ///
    /// Each call starts a fresh enumeration from the first page.
    fn playlist_item_uris<'a>(
        &'a self,
        playlist_id: &'a str,
    ) -> BoxStream<'a, Result<String, CatalogError>>;

    /// Append at most [`APPEND_BATCH_SIZE`] URIs to the end of a playlist.
    ///
    /// [`APPEND_BATCH_SIZE`]: super::domain::APPEND_BATCH_SIZE
    async fn append_items(&self, playlist_id: &str, uris: &[String]) -> Result<(), CatalogError>;
}

// Implement the trait for the real client

#[async_trait]
impl CatalogService for super::spotify::SpotifyClient {
    async fn search_track(&self, query: &str) -> Result<Option<String>, CatalogError> {
        self.search_track(query).await
    }

    async fn current_user_id(&self) -> Result<String, CatalogError> {
        Ok(self.user_id().to_string())
    }

    async fn create_playlist(
        &self,
        owner_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<PlaylistRef, CatalogError> {
        self.create_playlist(owner_id, name, description, public)
            .await
    }

    async fn get_playlist(&self, playlist_id: &str) -> Result<PlaylistRef, CatalogError> {
        self.get_playlist(playlist_id).await
    }

    fn playlist_item_uris<'a>(
        &'a self,
        playlist_id: &'a str,
    ) -> BoxStream<'a, Result<String, CatalogError>> {
        self.playlist_item_uris(playlist_id)
    }

    async fn append_items(&self, playlist_id: &str, uris: &[String]) -> Result<(), CatalogError> {
        self.append_items(playlist_id, uris).await
    }
}

/// Mock catalog for testing.
///
/// Returns configurable responses and records every call it receives.
#[cfg(test)]
pub mod mocks {
    use std::collections::{HashMap, HashSet};
    use std::time::Duration;

    use futures::stream::{self, StreamExt};
    use parking_lot::Mutex;

    use super::*;
    use crate::catalog::domain::{APPEND_BATCH_SIZE, ItemPage};
    use crate::catalog::paging::paged_uris;

    /// A call received by [`MockCatalog`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Search(String),
        CurrentUser,
        CreatePlaylist {
            owner_id: String,
            name: String,
            description: String,
            public: bool,
        },
        GetPlaylist(String),
        ItemsPage { playlist_id: String, offset: usize },
        Append { playlist_id: String, uris: Vec<String> },
    }

    /// Mock catalog with canned search hits and in-memory playlists.
    pub struct MockCatalog {
        /// Exact query string -> URI of the top hit
        pub hits: HashMap<String, String>,
        /// Queries that fail with a network error
        pub failing_queries: HashSet<String>,
        /// Existing playlists and their current items
        pub playlists: HashMap<String, Vec<String>>,
        /// Page size used when enumerating playlist items
        pub page_size: usize,
        /// Fail the n-th append call (0-based)
        pub fail_append_at: Option<usize>,
        /// Error returned by `current_user_id`
        pub current_user_error: Option<CatalogError>,
        /// Error returned by `create_playlist`
        pub create_error: Option<CatalogError>,
        /// Error returned by the first items page
        pub items_error: Option<CatalogError>,
        /// Every call fails with `Unauthorized`
        pub rejected_token: bool,
        /// How long each search takes
        pub search_delay: Option<Duration>,
        calls: Mutex<Vec<Call>>,
    }

    impl Default for MockCatalog {
        fn default() -> Self {
            Self {
                hits: HashMap::new(),
                failing_queries: HashSet::new(),
                playlists: HashMap::new(),
                page_size: 100,
                fail_append_at: None,
                current_user_error: None,
                create_error: None,
                items_error: None,
                rejected_token: false,
                search_delay: None,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl MockCatalog {
        /// Create a mock that finds nothing and knows no playlists.
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer `query` with `uri`.
        pub fn with_hit(mut self, query: &str, uri: &str) -> Self {
            self.hits.insert(query.to_string(), uri.to_string());
            self
        }

        /// Make `query` fail with a network error.
        pub fn with_failing_query(mut self, query: &str) -> Self {
            self.failing_queries.insert(query.to_string());
            self
        }

        /// Register an existing playlist holding `items`.
        pub fn with_playlist(mut self, id: &str, items: &[&str]) -> Self {
            self.playlists
                .insert(id.to_string(), items.iter().map(|s| s.to_string()).collect());
            self
        }

        pub fn with_page_size(mut self, page_size: usize) -> Self {
            self.page_size = page_size;
            self
        }

        /// Reject the access token on every call.
        pub fn with_rejected_token(mut self) -> Self {
            self.rejected_token = true;
            self
        }

        /// Make every search take `delay`.
        pub fn with_search_delay(mut self, delay: Duration) -> Self {
            self.search_delay = Some(delay);
            self
        }

        /// Every call received so far, in order.
        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().clone()
        }

        /// Queries searched so far, in order.
        pub fn searches(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::Search(q) => Some(q),
                    _ => None,
                })
                .collect()
        }

        /// URI lists of every append call, in order.
        pub fn appends(&self) -> Vec<Vec<String>> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::Append { uris, .. } => Some(uris),
                    _ => None,
                })
                .collect()
        }

        fn record(&self, call: Call) {
            self.calls.lock().push(call);
        }

        /// `Unauthorized` when the token is rejected, else `fallback`
        fn check(&self, fallback: &Option<CatalogError>) -> Result<(), CatalogError> {
            if self.rejected_token {
                return Err(CatalogError::Unauthorized("token rejected".to_string()));
            }
            fallback.clone().map_or(Ok(()), Err)
        }

        fn public_url(id: &str) -> String {
            format!("https://open.example.com/playlist/{}", id)
        }
    }

    #[async_trait]
    impl CatalogService for MockCatalog {
        async fn search_track(&self, query: &str) -> Result<Option<String>, CatalogError> {
            self.record(Call::Search(query.to_string()));
            if let Some(delay) = self.search_delay {
                tokio::time::sleep(delay).await;
            }
            self.check(&None)?;
            if self.failing_queries.contains(query) {
                return Err(CatalogError::Network("mock search failure".to_string()));
            }
            Ok(self.hits.get(query).cloned())
        }

        async fn current_user_id(&self) -> Result<String, CatalogError> {
            self.record(Call::CurrentUser);
            self.check(&self.current_user_error)?;
            Ok("mock-user".to_string())
        }

        async fn create_playlist(
            &self,
            owner_id: &str,
            name: &str,
            description: &str,
            public: bool,
        ) -> Result<PlaylistRef, CatalogError> {
            self.record(Call::CreatePlaylist {
                owner_id: owner_id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                public,
            });
            self.check(&self.create_error)?;
            Ok(PlaylistRef {
                id: "new-playlist".to_string(),
                public_url: Self::public_url("new-playlist"),
            })
        }

        async fn get_playlist(&self, playlist_id: &str) -> Result<PlaylistRef, CatalogError> {
            self.record(Call::GetPlaylist(playlist_id.to_string()));
            self.check(&None)?;
            if !self.playlists.contains_key(playlist_id) {
                return Err(CatalogError::NotFound);
            }
            Ok(PlaylistRef {
                id: playlist_id.to_string(),
                public_url: Self::public_url(playlist_id),
            })
        }

        fn playlist_item_uris<'a>(
            &'a self,
            playlist_id: &'a str,
        ) -> BoxStream<'a, Result<String, CatalogError>> {
            let Some(items) = self.playlists.get(playlist_id) else {
                return stream::once(async { Err(CatalogError::NotFound) }).boxed();
            };
            let page_size = self.page_size;
            paged_uris(move |offset| {
                self.record(Call::ItemsPage {
                    playlist_id: playlist_id.to_string(),
                    offset,
                });
                let failure = self.check(&self.items_error);
                let uris: Vec<String> = items.iter().skip(offset).take(page_size).cloned().collect();
                let page = ItemPage {
                    item_count: uris.len(),
                    has_next: offset + uris.len() < items.len(),
                    uris,
                };
                async move { failure.map(|_| page) }
            })
        }

        async fn append_items(
            &self,
            playlist_id: &str,
            uris: &[String],
        ) -> Result<(), CatalogError> {
            let index = self.appends().len();
            self.record(Call::Append {
                playlist_id: playlist_id.to_string(),
                uris: uris.to_vec(),
            });
            self.check(&None)?;
            if uris.len() > APPEND_BATCH_SIZE {
                return Err(CatalogError::InvalidRequest(format!(
                    "{} items in one append",
                    uris.len()
                )));
            }
            if self.fail_append_at == Some(index) {
                return Err(CatalogError::Api {
                    status: 500,
                    message: "mock append failure".to_string(),
                });
            }
            Ok(())
        }
    }

    mod tests {
        use super::*;
        use futures::TryStreamExt;

        #[tokio::test]
        async fn test_mock_search_hit_and_miss() {
            let mock = MockCatalog::new().with_hit("track:\"a\"", "spotify:track:a");
            assert_eq!(
                mock.search_track("track:\"a\"").await.unwrap().as_deref(),
                Some("spotify:track:a")
            );
            assert_eq!(mock.search_track("track:\"b\"").await.unwrap(), None);
            assert_eq!(mock.searches().len(), 2);
        }

        #[tokio::test]
        async fn test_mock_failing_query() {
            let mock = MockCatalog::new().with_failing_query("q");
            let result = mock.search_track("q").await;
            assert!(matches!(result, Err(CatalogError::Network(_))));
        }

        #[tokio::test]
        async fn test_mock_items_are_paged() {
            let mock = MockCatalog::new()
                .with_playlist("pl", &["a", "b", "c", "d", "e"])
                .with_page_size(2);
            let uris: Vec<String> = mock.playlist_item_uris("pl").try_collect().await.unwrap();
            assert_eq!(uris, vec!["a", "b", "c", "d", "e"]);

            let pages = mock
                .calls()
                .into_iter()
                .filter(|c| matches!(c, Call::ItemsPage { .. }))
                .count();
            assert_eq!(pages, 3);
        }

        #[tokio::test]
        async fn test_mock_item_stream_is_restartable() {
            let mock = MockCatalog::new().with_playlist("pl", &["a", "b"]);
            let first: Vec<String> = mock.playlist_item_uris("pl").try_collect().await.unwrap();
            let second: Vec<String> = mock.playlist_item_uris("pl").try_collect().await.unwrap();
            assert_eq!(first, second);
        }

        #[tokio::test]
        async fn test_mock_rejected_token() {
            let mock = MockCatalog::new()
                .with_playlist("pl", &["a"])
                .with_rejected_token();
            assert!(matches!(
                mock.search_track("q").await,
                Err(CatalogError::Unauthorized(_))
            ));
            assert!(matches!(
                mock.get_playlist("pl").await,
                Err(CatalogError::Unauthorized(_))
            ));
            let items: Result<Vec<String>, _> = mock.playlist_item_uris("pl").try_collect().await;
            assert!(matches!(items, Err(CatalogError::Unauthorized(_))));
        }

        #[tokio::test]
        async fn test_mock_unknown_playlist() {
            let mock = MockCatalog::new();
            assert_eq!(mock.get_playlist("nope").await, Err(CatalogError::NotFound));
        }
    }
}
