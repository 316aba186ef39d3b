//! Track matching - turns loose descriptors into catalog URIs.
//!
//! - `query`: builds the advanced query and its two fallbacks
//! - `matcher`: walks that retry ladder against a [`CatalogService`]
//!
//! [`CatalogService`]: crate::catalog::CatalogService

pub mod matcher;
pub mod query;

pub use matcher::{MatchResult, Matcher};
pub use query::{
    SearchAttempt, SearchStep, build_advanced_query, retry_ladder, track_artist_query,
    track_query,
};
