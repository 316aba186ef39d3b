//! Playlist mutation - the batch entry points.
//!
//! - `target`: new-vs-existing playlist, locator parsing, duplicate policy
//! - `importer`: match a batch, then create or extend the playlist

pub mod importer;
pub mod target;

pub use importer::{
    BatchOutcome, BatchReport, match_batch, process_batch, process_batch_with_credentials,
};
pub use target::{DuplicatePolicy, PlaylistTarget, parse_playlist_id};
