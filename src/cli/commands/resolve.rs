//! Matching dry runs: no playlist is created or modified.

use serde::Serialize;
use std::path::Path;
use tokio::runtime::Runtime;

use crate::catalog::SpotifyClient;
use crate::config::Config;
use crate::error::Result;
use crate::matching::{MatchResult, retry_ladder};
use crate::model::{TrackDescriptor, UnmatchedTrack};
use crate::playlist::match_batch;

use super::{fail, print_json, read_batch};

/// One descriptor's outcome, as printed by `resolve --json`
#[derive(Debug, Serialize)]
struct Resolved {
    index: usize,
    #[serde(flatten)]
    track: UnmatchedTrack,
    uri: Option<String>,
    step: Option<String>,
}

impl Resolved {
    fn new(index: usize, descriptor: &TrackDescriptor, result: &MatchResult) -> Self {
        let (uri, step) = match result {
            MatchResult::Found { uri, step } => (Some(uri.clone()), Some(step.to_string())),
            MatchResult::Unmatched(_) => (None, None),
        };
        Self {
            index,
            track: UnmatchedTrack::from(descriptor),
            uri,
            step,
        }
    }
}

/// Match every descriptor and print what it resolved to
pub fn cmd_resolve(rt: &Runtime, config: &Config, input: &Path, json: bool) -> anyhow::Result<()> {
    match resolve(rt, config, input) {
        Ok(resolved) if json => print_json(&resolved),
        Ok(resolved) => {
            for entry in &resolved {
                match (&entry.uri, &entry.step) {
                    (Some(uri), Some(step)) => {
                        println!("✓ #{} {} -> {} [{}]", entry.index, entry.track, uri, step)
                    }
                    _ => println!("✗ #{} {} -> no match", entry.index, entry.track),
                }
            }
            let found = resolved.iter().filter(|e| e.uri.is_some()).count();
            println!();
            println!("Matched {} of {} tracks", found, resolved.len());
            Ok(())
        }
        Err(e) => fail(e, json),
    }
}

fn resolve(rt: &Runtime, config: &Config, input: &Path) -> Result<Vec<Resolved>> {
    let descriptors = read_batch(input)?;

    let outcome = rt.block_on(async {
        let client = SpotifyClient::connect(&config.credentials, &config.http).await?;
        match_batch(&client, &descriptors).await
    })?;

    Ok(descriptors
        .iter()
        .zip(&outcome.results)
        .enumerate()
        .map(|(i, (descriptor, result))| Resolved::new(i + 1, descriptor, result))
        .collect())
}

/// Print the retry ladder of every descriptor; no network access
pub fn cmd_queries(input: &Path) -> anyhow::Result<()> {
    let descriptors = read_batch(input)?;

    for (i, descriptor) in descriptors.iter().enumerate() {
        println!("#{} {}", i + 1, UnmatchedTrack::from(descriptor));
        let ladder = retry_ladder(descriptor);
        if ladder.is_empty() {
            println!("  (no usable fields, nothing to search)");
        }
        for attempt in ladder {
            println!("  {:<12} {}", attempt.step.to_string(), attempt.query);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::SearchStep;
    use crate::model::FieldValue;
    use crate::test_utils::imagine;

    #[test]
    fn test_resolved_found_entry() {
        let result = MatchResult::Found {
            uri: "spotify:track:X".to_string(),
            step: SearchStep::TrackAndArtist,
        };
        let entry = Resolved::new(1, &imagine(), &result);

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["index"], 1);
        assert_eq!(json["track"], "Imagine");
        assert_eq!(json["artist"], "John Lennon");
        assert_eq!(json["uri"], "spotify:track:X");
        assert_eq!(json["step"], "track+artist");
    }

    #[test]
    fn test_resolved_unmatched_entry() {
        let descriptor = imagine();
        let result = MatchResult::Unmatched(UnmatchedTrack::from(&descriptor));
        let entry = Resolved::new(2, &descriptor, &result);

        assert_eq!(entry.uri, None);
        assert_eq!(entry.step, None);
        assert_eq!(entry.track.album, Some(FieldValue::from("Imagine")));
    }
}
