//! Descriptor -> catalog URI resolution.
//!
//! Free-text catalog search degrades with over-specification: a wrong year
//! or a malformed UPC can hide an otherwise correct hit. The matcher walks
//! the retry ladder from [`retry_ladder`], dropping constraints at each rung,
//! and stops at the first hit. Only the top hit of each query is considered.

use crate::catalog::{CatalogError, CatalogService};
use crate::error::{Error, Result};
use crate::model::{TrackDescriptor, UnmatchedTrack};

use super::query::{SearchStep, retry_ladder};

/// Outcome of resolving one descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// Catalog URI of the first hit, and the rung that produced it
    Found { uri: String, step: SearchStep },
    /// Every rung came back empty (or failed)
    Unmatched(UnmatchedTrack),
}

impl MatchResult {
    pub fn uri(&self) -> Option<&str> {
        match self {
            MatchResult::Found { uri, .. } => Some(uri),
            MatchResult::Unmatched(_) => None,
        }
    }
}

/// Resolves descriptors against an injected catalog.
pub struct Matcher<'a, C: CatalogService + ?Sized> {
    catalog: &'a C,
}

impl<'a, C: CatalogService + ?Sized> Matcher<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// Try each rung of the ladder in order until one hits.
    ///
    /// A failing search counts as "no result" for that rung; the ladder
    /// carries on. A rejected token is not a miss: it fails with
    /// [`Error::Authentication`] and no further query is sent. A descriptor
    /// with no usable field makes no calls at all.
    pub async fn resolve(&self, descriptor: &TrackDescriptor) -> Result<MatchResult> {
        for attempt in retry_ladder(descriptor) {
            tracing::debug!("Searching ({}): {}", attempt.step, attempt.query);

            match self.catalog.search_track(&attempt.query).await {
                Ok(Some(uri)) => {
                    tracing::debug!("Matched {} via {} query", uri, attempt.step);
                    return Ok(MatchResult::Found {
                        uri,
                        step: attempt.step,
                    });
                }
                Ok(None) => {}
                Err(CatalogError::Unauthorized(message)) => {
                    return Err(Error::authentication(format!(
                        "search rejected: {}",
                        message
                    )));
                }
                Err(e) => {
                    tracing::warn!("Search failed for '{}': {}", attempt.query, e);
                }
            }
        }

        Ok(MatchResult::Unmatched(UnmatchedTrack::from(descriptor)))
    }
}
