//! Core data models for track descriptors.
//!
//! A [`TrackDescriptor`] is one user-supplied record describing a track to
//! find. Every field is optional; values are either text or JSON numbers.
//!
//! # Input format
//!
//! A batch is a JSON array of objects:
//!
//! ```json
//! [
//!   {"track": "Imagine", "artist": "John Lennon", "year": 1971},
//!   {"isrc": "GBAYE0601498"}
//! ]
//! ```
//!
//! Unknown keys are ignored. Empty strings, zero and `null` count as absent.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// A recognized descriptor field.
///
/// [`Field::ALL`] is the order in which query clauses are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Track,
    Artist,
    Album,
    Year,
    Upc,
    Tag,
    Isrc,
    Genre,
}

impl Field {
    /// Every field, in clause order.
    pub const ALL: [Field; 8] = [
        Field::Track,
        Field::Artist,
        Field::Album,
        Field::Year,
        Field::Upc,
        Field::Tag,
        Field::Isrc,
        Field::Genre,
    ];

    /// Key used both in the input JSON and as the search filter name.
    pub fn name(self) -> &'static str {
        match self {
            Field::Track => "track",
            Field::Artist => "artist",
            Field::Album => "album",
            Field::Year => "year",
            Field::Upc => "upc",
            Field::Tag => "tag",
            Field::Isrc => "isrc",
            Field::Genre => "genre",
        }
    }

    /// Free-text fields are quoted in queries; codes and years are not.
    pub fn is_quoted(self) -> bool {
        matches!(
            self,
            Field::Track | Field::Artist | Field::Album | Field::Genre
        )
    }
}

/// A single descriptor value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
}

impl FieldValue {
    /// Empty text and numeric zero are treated as "not provided".
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Number(n) => n.as_f64() == Some(0.0),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n.into())
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(n.into())
    }
}

/// A user-supplied record describing one track to find.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upc: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isrc: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<FieldValue>,
}

impl TrackDescriptor {
    /// Builder-style setter, mostly for tests and the CLI.
    pub fn with(mut self, field: Field, value: impl Into<FieldValue>) -> Self {
        *self.slot_mut(field) = Some(value.into());
        self
    }

    /// The value of a field, or `None` when it is absent or blank.
    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.slot(field).as_ref().filter(|v| !v.is_blank())
    }

    pub fn has(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    /// True when no recognized field carries a usable value.
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| !self.has(*f))
    }

    fn slot(&self, field: Field) -> &Option<FieldValue> {
        match field {
            Field::Track => &self.track,
            Field::Artist => &self.artist,
            Field::Album => &self.album,
            Field::Year => &self.year,
            Field::Upc => &self.upc,
            Field::Tag => &self.tag,
            Field::Isrc => &self.isrc,
            Field::Genre => &self.genre,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<FieldValue> {
        match field {
            Field::Track => &mut self.track,
            Field::Artist => &mut self.artist,
            Field::Album => &mut self.album,
            Field::Year => &mut self.year,
            Field::Upc => &mut self.upc,
            Field::Tag => &mut self.tag,
            Field::Isrc => &mut self.isrc,
            Field::Genre => &mut self.genre,
        }
    }
}

/// Reporting view of a descriptor that found no catalog match.
///
/// Holds the values exactly as supplied, blanks and numbers included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedTrack {
    pub track: Option<FieldValue>,
    pub artist: Option<FieldValue>,
    pub album: Option<FieldValue>,
}

impl From<&TrackDescriptor> for UnmatchedTrack {
    fn from(descriptor: &TrackDescriptor) -> Self {
        Self {
            track: descriptor.track.clone(),
            artist: descriptor.artist.clone(),
            album: descriptor.album.clone(),
        }
    }
}

impl fmt::Display for UnmatchedTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn or_na(value: &Option<FieldValue>) -> String {
            value
                .as_ref()
                .map_or_else(|| "N/A".to_string(), ToString::to_string)
        }
        write!(
            f,
            "{} - {} ({})",
            or_na(&self.artist),
            or_na(&self.track),
            or_na(&self.album),
        )
    }
}

/// Parse a JSON batch of descriptors.
///
/// Rejects anything that is not an array of objects, and field values that
/// are neither string, number nor null.
pub fn parse_batch(text: &str) -> Result<Vec<TrackDescriptor>> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| Error::input_format(format!("batch is not valid JSON: {}", e)))?;

    let Value::Array(items) = value else {
        return Err(Error::input_format(
            "expected a JSON array of track objects",
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| parse_descriptor(index, item))
        .collect()
}

fn parse_descriptor(index: usize, item: Value) -> Result<TrackDescriptor> {
    let Value::Object(map) = item else {
        return Err(Error::input_format(format!(
            "element {} is not a JSON object",
            index
        )));
    };

    let mut descriptor = TrackDescriptor::default();
    for field in Field::ALL {
        let value = match map.get(field.name()) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) => FieldValue::Text(s.clone()),
            Some(Value::Number(n)) => FieldValue::Number(n.clone()),
            Some(_) => {
                return Err(Error::input_format(format!(
                    "element {}: field `{}` must be a string or a number",
                    index,
                    field.name()
                )));
            }
        };
        *descriptor.slot_mut(field) = Some(value);
    }
    Ok(descriptor)
}
