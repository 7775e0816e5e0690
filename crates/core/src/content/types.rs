//! Types produced by URL classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a catalog URL points at, as far as downloading is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Track,
    Episode,
    /// Anything that is not a direct track/episode link. The raw input is
    /// searched as-is.
    Unresolved,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Episode => "episode",
            Self::Unresolved => "unresolved",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified (kind, id) pair derived from an input URL.
///
/// For [`ContentKind::Unresolved`] the `id` holds the raw input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentReference {
    pub kind: ContentKind,
    pub id: String,
}

impl ContentReference {
    pub fn track(id: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Track,
            id: id.into(),
        }
    }

    pub fn episode(id: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Episode,
            id: id.into(),
        }
    }

    pub fn unresolved(raw: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Unresolved,
            id: raw.into(),
        }
    }

    /// Whether this reference needs a metadata lookup before searching.
    pub fn is_direct(&self) -> bool {
        !matches!(self.kind, ContentKind::Unresolved)
    }
}

/// Text used to locate audio on the search provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self(query.into())
    }

    /// `"<title> - <artist1, artist2>"`
    pub fn for_track<S: AsRef<str>>(title: &str, artists: &[S]) -> Self {
        let artists = artists
            .iter()
            .map(|a| a.as_ref())
            .collect::<Vec<_>>()
            .join(", ");
        Self(format!("{} - {}", title, artists))
    }

    /// `"<show> - <episode>"`
    pub fn for_episode(show: &str, episode: &str) -> Self {
        Self(format!("{} - {}", show, episode))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SearchQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
