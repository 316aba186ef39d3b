//! Search query construction.
//!
//! Queries use the catalog's field-filter syntax: `track:"Imagine"
//! artist:"John Lennon" year:1971`. Free-text fields are quoted, codes and
//! years are not. Values are inserted verbatim.

use std::fmt;

use crate::model::{Field, TrackDescriptor};

/// One rung of the retry ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStep {
    /// Every available field
    Advanced,
    /// Track and artist only
    TrackAndArtist,
    /// Track only
    TrackOnly,
}

impl fmt::Display for SearchStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SearchStep::Advanced => "advanced",
            SearchStep::TrackAndArtist => "track+artist",
            SearchStep::TrackOnly => "track",
        })
    }
}

/// A query the matcher will send, tagged with its rung.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchAttempt {
    pub step: SearchStep,
    pub query: String,
}

/// Build the query from every field present, in [`Field::ALL`] order.
///
/// Returns an empty string when the descriptor has no usable field.
pub fn build_advanced_query(descriptor: &TrackDescriptor) -> String {
    scoped_query(descriptor, &Field::ALL)
}

/// `track:"..." artist:"..."`, only when both fields are present.
pub fn track_artist_query(descriptor: &TrackDescriptor) -> Option<String> {
    (descriptor.has(Field::Track) && descriptor.has(Field::Artist))
        .then(|| scoped_query(descriptor, &[Field::Track, Field::Artist]))
}

/// `track:"..."`, only when the track field is present.
pub fn track_query(descriptor: &TrackDescriptor) -> Option<String> {
    descriptor
        .has(Field::Track)
        .then(|| scoped_query(descriptor, &[Field::Track]))
}

/// Every query the matcher would try for `descriptor`, in order.
pub fn retry_ladder(descriptor: &TrackDescriptor) -> Vec<SearchAttempt> {
    let advanced = Some(build_advanced_query(descriptor)).filter(|q| !q.is_empty());

    [
        (SearchStep::Advanced, advanced),
        (SearchStep::TrackAndArtist, track_artist_query(descriptor)),
        (SearchStep::TrackOnly, track_query(descriptor)),
    ]
    .into_iter()
    .filter_map(|(step, query)| query.map(|query| SearchAttempt { step, query }))
    .collect()
}

fn scoped_query(descriptor: &TrackDescriptor, fields: &[Field]) -> String {
    fields
        .iter()
        .filter_map(|&field| descriptor.get(field).map(|value| clause(field, value)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn clause(field: Field, value: &impl fmt::Display) -> String {
    if field.is_quoted() {
        format!("{}:\"{}\"", field.name(), value)
    } else {
        format!("{}:{}", field.name(), value)
    }
}
