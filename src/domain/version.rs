use crate::domain::segment::{compare_segments, tokenize, Segment};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A release identifier in git's own versioning scheme.
///
/// Holds the normalized text (no `v` prefix, dashes turned into dots) and orders by
/// [`compare_segments`], so `1.7.5.rc0 < 1.7.5 < 1.7.5.1` and `1.0.0 < 1.0.0a < 1.0.1`.
/// Equality is comparator equality: `1.7.5-rc0` and `1.7.5.rc0` are the same version.
#[derive(Debug, Clone)]
pub struct Version {
    text: String,
    segments: Vec<Segment>,
}

impl Version {
    /// Create a version from a tag name or a version string (e.g., "v1.7.5-rc0" -> "1.7.5.rc0")
    pub fn new(raw: &str) -> Self {
        let text = normalize(raw);
        let segments = tokenize(&text);
        Version { text, segments }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether this version carries a release-candidate marker
    pub fn is_prerelease(&self) -> bool {
        self.segments.iter().any(Segment::is_prerelease)
    }
}

/// Strip the prefix marker and translate internal dashes to dots
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_prefix = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    without_prefix.replace('-', ".")
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_segments(&self.segments, &other.segments)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.segments.hash(state);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl From<&str> for Version {
    fn from(raw: &str) -> Self {
        Version::new(raw)
    }
}
