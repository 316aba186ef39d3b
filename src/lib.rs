//! Playlist Porter - turn a JSON list of loosely described tracks into a
//! Spotify playlist.
//!
//! Each descriptor is matched against the catalog with a progressively
//! relaxed search, and the hits are appended to a new or existing playlist.
//! The library is driven by [`playlist::process_batch_with_credentials`];
//! the `playlist-porter` binary wraps it in a CLI.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod matching;
pub mod model;
pub mod playlist;
#[cfg(test)]
pub mod test_utils;

pub use error::{Error, Result};
