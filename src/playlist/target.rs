//! Where found tracks go, and how duplicates are treated.

use crate::config::PlaylistConfig;
use crate::error::{Error, Result};

/// The playlist a batch is appended to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistTarget {
    /// Create a fresh playlist owned by the authenticated user
    Create {
        name: String,
        description: String,
        public: bool,
    },
    /// Append to a playlist that already exists
    Existing {
        playlist_id: String,
        /// What the user typed, kept for error messages
        locator: String,
    },
}

impl PlaylistTarget {
    /// Target a new playlist. A missing description falls back to the
    /// configured default.
    pub fn new_playlist(
        name: &str,
        description: Option<&str>,
        defaults: &PlaylistConfig,
    ) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::input_format("a name is required for a new playlist"));
        }

        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(&defaults.default_description);

        Ok(Self::Create {
            name: name.to_string(),
            description: description.to_string(),
            public: defaults.public,
        })
    }

    /// Target an existing playlist by URL, URI or bare ID.
    pub fn existing(locator: &str) -> Result<Self> {
        let playlist_id = parse_playlist_id(locator).ok_or_else(|| {
            Error::input_format(format!("cannot read a playlist ID from '{}'", locator))
        })?;

        Ok(Self::Existing {
            playlist_id,
            locator: locator.trim().to_string(),
        })
    }
}

/// Extract the playlist ID from a locator.
///
/// Handles `https://open.spotify.com/playlist/<id>?si=...`,
/// `spotify:playlist:<id>` and a bare `<id>`.
pub fn parse_playlist_id(locator: &str) -> Option<String> {
    let without_query = locator
        .trim()
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');

    without_query
        .rsplit(['/', ':'])
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Whether found tracks already in the target playlist are skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Append everything that was found
    #[default]
    AddAll,
    /// Skip URIs the existing playlist already holds.
    ///
    /// Only compares against the playlist's current contents: the same track
    /// found twice in one batch is appended twice.
    AddNew,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_web_url_with_query() {
        assert_eq!(
            parse_playlist_id("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M?si=abc123")
                .as_deref(),
            Some("37i9dQZF1DXcBWIGoYBM5M")
        );
    }

    #[test]
    fn test_parse_web_url_trailing_slash() {
        assert_eq!(
            parse_playlist_id("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M/")
                .as_deref(),
            Some("37i9dQZF1DXcBWIGoYBM5M")
        );
    }

    #[test]
    fn test_parse_uri_and_bare_id() {
        assert_eq!(
            parse_playlist_id("spotify:playlist:37i9dQZF1DXcBWIGoYBM5M").as_deref(),
            Some("37i9dQZF1DXcBWIGoYBM5M")
        );
        assert_eq!(
            parse_playlist_id("  37i9dQZF1DXcBWIGoYBM5M ").as_deref(),
            Some("37i9dQZF1DXcBWIGoYBM5M")
        );
    }

    #[test]
    fn test_parse_empty_locator() {
        assert_eq!(parse_playlist_id(""), None);
        assert_eq!(parse_playlist_id("?si=x"), None);
        assert_eq!(parse_playlist_id("spotify:playlist:"), None);
    }

    #[test]
    fn test_existing_rejects_empty_locator() {
        let err = PlaylistTarget::existing("   ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputFormat);
    }

    #[test]
    fn test_new_playlist_uses_default_description() {
        let defaults = PlaylistConfig::default();
        let target = PlaylistTarget::new_playlist("Road trip", None, &defaults).unwrap();
        assert_eq!(
            target,
            PlaylistTarget::Create {
                name: "Road trip".to_string(),
                description: defaults.default_description.clone(),
                public: true,
            }
        );
    }

    #[test]
    fn test_new_playlist_custom_description() {
        let target =
            PlaylistTarget::new_playlist("Road trip", Some("Summer 2026"), &PlaylistConfig::default())
                .unwrap();
        let PlaylistTarget::Create { description, .. } = target else {
            panic!("expected a new playlist");
        };
        assert_eq!(description, "Summer 2026");
    }

    #[test]
    fn test_new_playlist_requires_name() {
        let err = PlaylistTarget::new_playlist("  ", None, &PlaylistConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputFormat);
    }

    #[test]
    fn test_default_policy_adds_all() {
        assert_eq!(DuplicatePolicy::default(), DuplicatePolicy::AddAll);
    }
}
