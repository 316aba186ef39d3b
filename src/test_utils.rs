//! Test utilities and fixtures for playlist-porter tests.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{imagine, descriptor};
//!
//! let full = imagine();
//! let loose = descriptor("Jolene", "Dolly Parton", "Jolene");
//! ```

use crate::model::{Field, TrackDescriptor};

/// A fully specified descriptor: track, artist, album and year.
pub fn imagine() -> TrackDescriptor {
    TrackDescriptor::default()
        .with(Field::Track, "Imagine")
        .with(Field::Artist, "John Lennon")
        .with(Field::Album, "Imagine")
        .with(Field::Year, 1971)
}

/// A descriptor with only track, artist and album set.
pub fn descriptor(track: &str, artist: &str, album: &str) -> TrackDescriptor {
    TrackDescriptor::default()
        .with(Field::Track, track)
        .with(Field::Artist, artist)
        .with(Field::Album, album)
}

/// `count` descriptors with tracks named `song-0`, `song-1`, ...
pub fn numbered_descriptors(count: usize) -> Vec<TrackDescriptor> {
    (0..count)
        .map(|i| descriptor(&format!("song-{}", i), "Test Artist", "Test Album"))
        .collect()
}
