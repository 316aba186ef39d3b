//! Catalog layer - everything that talks to the music service.
//!
//! # Architecture
//!
//! Same layering as any external API we integrate:
//! - **Domain models** (`domain.rs`) - `PlaylistRef`, `CatalogError`
//! - **Trait** (`traits.rs`) - the `CatalogService` capability the importer consumes
//! - **Paging** (`paging.rs`) - offset pagination as a lazy stream
//! - **Spotify** (`spotify/`) - DTOs, adapters, HTTP client and OAuth helpers
//!
//! Business logic only ever sees the trait and the domain types, so tests
//! can run the whole import against the mock in `traits::mocks`.

pub mod domain;
pub mod paging;
pub mod spotify;
pub mod traits;

pub use domain::{APPEND_BATCH_SIZE, CatalogError, ItemPage, PlaylistRef};
pub use spotify::SpotifyClient;
pub use traits::CatalogService;
