//! Batch import - match every descriptor, then mutate the target playlist.
//!
//! This is the high-level API:
//! 1. Resolve each descriptor with the [`Matcher`], in input order
//! 2. Create the target playlist, or look up the existing one
//! 3. Optionally drop URIs the existing playlist already holds
//! 4. Append what is left in chunks of [`APPEND_BATCH_SIZE`]

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use futures::TryStreamExt;
use serde::Serialize;

use crate::catalog::{APPEND_BATCH_SIZE, CatalogError, CatalogService, PlaylistRef, SpotifyClient};
use crate::config::{Credentials, HttpConfig};
use crate::error::{Error, Result};
use crate::matching::{MatchResult, Matcher};
use crate::model::{TrackDescriptor, UnmatchedTrack};

use super::target::{DuplicatePolicy, PlaylistTarget};

/// Matching results for one batch, in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// One result per descriptor
    pub results: Vec<MatchResult>,
    /// URIs of every match
    pub found_uris: Vec<String>,
    /// Descriptors nothing was found for
    pub unmatched: Vec<UnmatchedTrack>,
}

impl BatchOutcome {
    fn push(&mut self, result: MatchResult) {
        match &result {
            MatchResult::Found { uri, .. } => self.found_uris.push(uri.clone()),
            MatchResult::Unmatched(track) => self.unmatched.push(track.clone()),
        }
        self.results.push(result);
    }
}

/// What a finished import reports back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub playlist_id: String,
    pub playlist_url: String,
    /// URIs actually appended
    pub added_count: usize,
    /// Found URIs left out because the playlist already had them
    pub skipped_duplicates: usize,
    pub unmatched: Vec<UnmatchedTrack>,
}

/// Resolve every descriptor, one after the other.
///
/// Stops at the first authentication failure; other search failures only
/// cost the descriptor its match.
pub async fn match_batch<C: CatalogService + ?Sized>(
    catalog: &C,
    descriptors: &[TrackDescriptor],
) -> Result<BatchOutcome> {
    let matcher = Matcher::new(catalog);
    let mut outcome = BatchOutcome::default();

    for (i, descriptor) in descriptors.iter().enumerate() {
        outcome.push(matcher.resolve(descriptor).await?);

        // Progress logging
        if (i + 1) % 10 == 0 {
            tracing::info!("Matched {}/{} tracks", i + 1, descriptors.len());
        }
    }

    tracing::info!(
        "Found {} of {} tracks ({} unmatched)",
        outcome.found_uris.len(),
        descriptors.len(),
        outcome.unmatched.len()
    );
    Ok(outcome)
}

/// Match a batch and append the hits to the target playlist.
///
/// Search failures are absorbed by the matcher. Rejected credentials,
/// playlist resolution, item enumeration and append failures abort the batch.
pub async fn process_batch<C: CatalogService + ?Sized>(
    catalog: &C,
    descriptors: &[TrackDescriptor],
    target: &PlaylistTarget,
    policy: DuplicatePolicy,
) -> Result<BatchReport> {
    let outcome = match_batch(catalog, descriptors).await?;
    let playlist = resolve_target(catalog, target).await?;

    let (to_add, skipped_duplicates) = match (target, policy) {
        (PlaylistTarget::Existing { .. }, DuplicatePolicy::AddNew) => {
            let existing = existing_uris(catalog, &playlist.id).await?;
            let found = outcome.found_uris.len();
            let fresh = filter_new(outcome.found_uris, &existing);
            let skipped = found - fresh.len();
            tracing::info!(
                "Skipping {} tracks already in the playlist, {} left to add",
                skipped,
                fresh.len()
            );
            (fresh, skipped)
        }
        _ => (outcome.found_uris, 0),
    };

    append_in_batches(catalog, &playlist.id, &to_add).await?;

    Ok(BatchReport {
        playlist_id: playlist.id,
        playlist_url: playlist.public_url,
        added_count: to_add.len(),
        skipped_duplicates,
        unmatched: outcome.unmatched,
    })
}

/// Authenticate with the catalog service, then run [`process_batch`].
///
/// The whole run, authentication included, is bounded by the configured
/// batch deadline.
pub async fn process_batch_with_credentials(
    credentials: &Credentials,
    http: &HttpConfig,
    descriptors: &[TrackDescriptor],
    target: &PlaylistTarget,
    policy: DuplicatePolicy,
) -> Result<BatchReport> {
    let run = async {
        let catalog = SpotifyClient::connect(credentials, http).await?;
        process_batch(&catalog, descriptors, target, policy).await
    };

    with_deadline(http.batch_deadline(), run).await
}

/// Run `work`, giving up with [`Error::Timeout`] once `deadline` passes
async fn with_deadline<T>(
    deadline: Option<Duration>,
    work: impl Future<Output = Result<T>>,
) -> Result<T> {
    match deadline {
        Some(deadline) => tokio::time::timeout(deadline, work)
            .await
            .map_err(|_| Error::Timeout(deadline))?,
        None => work.await,
    }
}

/// A rejected token is an authentication failure whatever the call;
/// anything else gets the caller's error
fn catalog_failure(error: CatalogError, otherwise: impl FnOnce(CatalogError) -> Error) -> Error {
    match error {
        CatalogError::Unauthorized(message) => Error::authentication(message),
        other => otherwise(other),
    }
}

async fn resolve_target<C: CatalogService + ?Sized>(
    catalog: &C,
    target: &PlaylistTarget,
) -> Result<PlaylistRef> {
    match target {
        PlaylistTarget::Existing {
            playlist_id,
            locator,
        } => match catalog.get_playlist(playlist_id).await {
            Ok(playlist) => {
                tracing::info!("Adding to existing playlist {}", playlist.public_url);
                Ok(playlist)
            }
            Err(CatalogError::NotFound) => Err(Error::PlaylistNotFound(locator.clone())),
            Err(e) => Err(catalog_failure(e, |e| {
                Error::playlist(format!("could not look up playlist {}: {}", locator, e))
            })),
        },
        PlaylistTarget::Create {
            name,
            description,
            public,
        } => {
            let owner = catalog.current_user_id().await.map_err(|e| {
                Error::authentication(format!("could not determine current user: {}", e))
            })?;
            let playlist = catalog
                .create_playlist(&owner, name, description, *public)
                .await
                .map_err(|e| {
                    catalog_failure(e, |e| {
                        Error::playlist(format!("could not create playlist '{}': {}", name, e))
                    })
                })?;
            tracing::info!("Created playlist '{}' ({})", name, playlist.public_url);
            Ok(playlist)
        }
    }
}

/// Drain the playlist's item stream into a set
async fn existing_uris<C: CatalogService + ?Sized>(
    catalog: &C,
    playlist_id: &str,
) -> Result<HashSet<String>> {
    let existing: HashSet<String> = catalog
        .playlist_item_uris(playlist_id)
        .try_collect()
        .await
        .map_err(|e| {
            catalog_failure(e, |e| {
                Error::playlist(format!(
                    "could not list items of playlist {}: {}",
                    playlist_id, e
                ))
            })
        })?;
    tracing::info!("Playlist {} already holds {} tracks", playlist_id, existing.len());
    Ok(existing)
}

/// Keep only URIs not in `existing`, preserving order
fn filter_new(found: Vec<String>, existing: &HashSet<String>) -> Vec<String> {
    found
        .into_iter()
        .filter(|uri| !existing.contains(uri))
        .collect()
}

async fn append_in_batches<C: CatalogService + ?Sized>(
    catalog: &C,
    playlist_id: &str,
    uris: &[String],
) -> Result<()> {
    for (i, chunk) in uris.chunks(APPEND_BATCH_SIZE).enumerate() {
        catalog
            .append_items(playlist_id, chunk)
            .await
            .map_err(|source| Error::Append {
                playlist_id: playlist_id.to_string(),
                appended: i * APPEND_BATCH_SIZE,
                source,
            })?;
        tracing::info!("Added batch of {} tracks", chunk.len());
    }
    Ok(())
}
