use crate::domain::version::Version;
use crate::error::Result;
use regex::Regex;
use std::fmt;

/// Pattern handed to git when listing release tags
pub const RELEASE_TAG_GLOB: &str = "v[0-9]*";

/// Raw tags that predate the stable baseline: major version 0 and the 1.0 release candidates
const EXCLUDED_TAG_PATTERNS: &[&str] = &[r"^v0\.", r"^v1\.0rc"];

/// Represents a git tag
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    /// Create a new tag from a string
    pub fn new(name: impl Into<String>) -> Self {
        Tag { name: name.into() }
    }

    /// Normalized version for this tag (e.g., "v1.7.5-rc0" -> "1.7.5.rc0")
    pub fn version(&self) -> Version {
        Version::new(&self.name)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Exclusion rules applied to raw tag names before normalization
#[derive(Debug, Clone)]
pub struct TagFilter {
    excluded: Vec<Regex>,
}

impl TagFilter {
    /// Filter with the built-in exclusions
    pub fn release() -> Result<Self> {
        Self::with_patterns(EXCLUDED_TAG_PATTERNS)
    }

    pub fn with_patterns(patterns: &[&str]) -> Result<Self> {
        let excluded = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(TagFilter { excluded })
    }

    /// Whether a raw tag is a release tag that survives the exclusions
    pub fn accepts(&self, tag: &str) -> bool {
        let is_release = tag.starts_with('v')
            && tag[1..].starts_with(|c: char| c.is_ascii_digit());
        is_release && !self.excluded.iter().any(|re| re.is_match(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_version() {
        let tag = Tag::new("v1.7.5-rc0");
        assert_eq!(tag.version().as_str(), "1.7.5.rc0");
    }

    #[test]
    fn test_filter_excludes_major_zero() {
        let filter = TagFilter::release().unwrap();
        assert!(!filter.accepts("v0.99"));
        assert!(!filter.accepts("v0.99.9k"));
    }

    #[test]
    fn test_filter_excludes_first_release_candidates() {
        let filter = TagFilter::release().unwrap();
        assert!(!filter.accepts("v1.0rc1"));
        assert!(!filter.accepts("v1.0rc6"));
        assert!(filter.accepts("v1.0.0"));
        assert!(filter.accepts("v1.7.5-rc0"));
    }

    #[test]
    fn test_filter_rejects_non_release_tags() {
        let filter = TagFilter::release().unwrap();
        assert!(!filter.accepts("gitgui-0.7.0"));
        assert!(!filter.accepts("junio-gpg-pub"));
        assert!(!filter.accepts("v"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(TagFilter::with_patterns(&["(unclosed"]).is_err());
    }
}
