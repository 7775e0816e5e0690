//! Catalog URL classification.
//!
//! Turns a user supplied link into a [`ContentReference`]. Only direct
//! track and episode links are resolved through the metadata catalog;
//! everything else (artist, album, playlist pages or arbitrary text) is
//! handed to the search provider verbatim.

mod types;

pub use types::{ContentKind, ContentReference, SearchQuery};

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// Catalog host used when none is configured.
pub const DEFAULT_CATALOG_DOMAIN: &str = "spotify.com";

static DEFAULT_CLASSIFIER: Lazy<UrlClassifier> =
    Lazy::new(|| UrlClassifier::new(DEFAULT_CATALOG_DOMAIN));

/// Classifier for `https?://open.<domain>/<kind>/<id>` links.
#[derive(Debug, Clone)]
pub struct UrlClassifier {
    domain: String,
    pattern: Regex,
    uri_pattern: Regex,
}

impl UrlClassifier {
    /// Build a classifier for the given catalog domain (e.g. `spotify.com`).
    pub fn new(domain: &str) -> Self {
        let escaped = regex_lite::escape(domain);
        let pattern = Regex::new(&format!(
            r"^https?://open\.{}/(?:intl-[a-zA-Z]{{2}}(?:-[a-zA-Z]{{2}})?/)?(track|artist|playlist|album|episode)/([a-zA-Z0-9]+)(?:[/?#]|$)",
            escaped
        ))
        .expect("catalog url pattern is valid");

        let scheme = domain.split('.').next().unwrap_or(domain);
        let uri_pattern = Regex::new(&format!(
            r"^{}:(track|episode):([a-zA-Z0-9]+)$",
            regex_lite::escape(scheme)
        ))
        .expect("catalog uri pattern is valid");

        Self {
            domain: domain.to_string(),
            pattern,
            uri_pattern,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Whether `url` is an accepted catalog link (any of the five kinds).
    pub fn is_catalog_url(&self, url: &str) -> bool {
        self.pattern.is_match(url.trim())
    }

    /// Classify a link. Never fails; unknown shapes come back as
    /// [`ContentKind::Unresolved`] carrying the raw input.
    pub fn classify(&self, url: &str) -> ContentReference {
        let trimmed = url.trim();

        let captures = self
            .pattern
            .captures(trimmed)
            .or_else(|| self.uri_pattern.captures(trimmed));

        if let Some(caps) = captures {
            let id = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
            match caps.get(1).map(|m| m.as_str()) {
                Some("track") => return ContentReference::track(id),
                Some("episode") => return ContentReference::episode(id),
                _ => {}
            }
        }

        ContentReference::unresolved(trimmed)
    }
}

impl Default for UrlClassifier {
    fn default() -> Self {
        DEFAULT_CLASSIFIER.clone()
    }
}

/// Classify using the default catalog domain.
pub fn classify(url: &str) -> ContentReference {
    DEFAULT_CLASSIFIER.classify(url)
}

/// Validate a link against the default catalog domain.
pub fn is_catalog_url(url: &str) -> bool {
    DEFAULT_CLASSIFIER.is_catalog_url(url)
}
