//! The universe of known releases and the alias table applied to them.

use crate::domain::{Tag, TagFilter, Version};
use crate::error::Result;
use crate::warning::RunWarning;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Mapping of every buildable version to the tag it came from, ordered ascending.
#[derive(Debug, Clone, Default)]
pub struct VersionCatalog {
    entries: BTreeMap<Version, Tag>,
}

impl VersionCatalog {
    /// Build the catalog from raw tag names using the built-in exclusions.
    ///
    /// Returns the catalog plus a warning for every tag that normalized onto a version
    /// already claimed by an earlier tag (tags are visited in sorted order).
    pub fn build<S: AsRef<str>>(raw_tags: &[S]) -> Result<(Self, Vec<RunWarning>)> {
        let filter = TagFilter::release()?;
        Ok(Self::build_with_filter(raw_tags, &filter))
    }

    pub fn build_with_filter<S: AsRef<str>>(
        raw_tags: &[S],
        filter: &TagFilter,
    ) -> (Self, Vec<RunWarning>) {
        let mut names: Vec<&str> = raw_tags.iter().map(|t| t.as_ref()).collect();
        names.sort_unstable();
        names.dedup();

        let mut entries: BTreeMap<Version, Tag> = BTreeMap::new();
        let mut warnings = Vec::new();

        for name in names {
            if !filter.accepts(name) {
                debug!(tag = name, "excluded from catalog");
                continue;
            }

            let tag = Tag::new(name);
            let version = tag.version();
            if let Some(existing) = entries.get(&version) {
                warnings.push(RunWarning::TagCollision {
                    tag: tag.name.clone(),
                    existing: existing.name.clone(),
                });
                continue;
            }
            entries.insert(version, tag);
        }

        debug!(versions = entries.len(), "catalog built");
        (VersionCatalog { entries }, warnings)
    }

    /// Build from explicit (version, tag) pairs, bypassing tag filtering
    pub fn from_entries<I, V, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (V, T)>,
        V: AsRef<str>,
        T: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(v, t)| (Version::new(v.as_ref()), Tag::new(t)))
            .collect();
        VersionCatalog { entries }
    }

    pub fn tag_for(&self, version: &Version) -> Option<&Tag> {
        self.entries.get(version)
    }

    pub fn contains(&self, version: &Version) -> bool {
        self.entries.contains_key(version)
    }

    /// All versions in ascending order
    pub fn versions(&self) -> impl Iterator<Item = &Version> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Releases that re-tag an earlier release under a bumped number: 1.0.1 and 1.0.2 are the
/// 1.0.0a and 1.0.0b maintenance releases
const BUILTIN_ALIASES: &[(&str, &str)] = &[("1.0.1", "1.0.0a"), ("1.0.2", "1.0.0b")];

/// Fixed table of version -> canonical version substitutions
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    aliases: HashMap<Version, Version>,
}

impl AliasMap {
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_ALIASES.iter().copied())
    }

    pub fn from_pairs<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let aliases = pairs
            .into_iter()
            .map(|(from, to)| (Version::new(from.as_ref()), Version::new(to.as_ref())))
            .collect();
        AliasMap { aliases }
    }

    /// Canonical version for `version` (itself when it has no alias)
    pub fn resolve<'a>(&'a self, version: &'a Version) -> &'a Version {
        self.aliases.get(version).unwrap_or(version)
    }

    /// Substitute aliases and drop later duplicates, keeping first-seen order
    pub fn canonicalize(&self, versions: Vec<Version>) -> Vec<Version> {
        let mut seen = std::collections::HashSet::new();
        versions
            .iter()
            .map(|v| self.resolve(v).clone())
            .filter(|v| seen.insert(v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(versions: &[Version]) -> Vec<&str> {
        versions.iter().map(|v| v.as_str()).collect()
    }

    #[test]
    fn test_build_applies_exclusions_and_normalizes() {
        let tags = ["v0.99", "v1.0rc1", "v1.0.0", "v1.7.5-rc0", "v1.7.5", "gitgui-0.6.0"];
        let (catalog, warnings) = VersionCatalog::build(&tags).unwrap();

        assert!(warnings.is_empty());
        let versions: Vec<&str> = catalog.versions().map(|v| v.as_str()).collect();
        assert_eq!(versions, vec!["1.0.0", "1.7.5.rc0", "1.7.5"]);
    }

    #[test]
    fn test_round_trip_tag_lookup() {
        let tags = ["v1.0.0", "v1.0.0a", "v1.7.5-rc0", "v2.0.0"];
        let (catalog, _) = VersionCatalog::build(&tags).unwrap();

        for raw in tags {
            let version = Tag::new(raw).version();
            assert_eq!(catalog.tag_for(&version).map(|t| t.name.as_str()), Some(raw));
        }
    }

    #[test]
    fn test_colliding_tags_keep_first() {
        let tags = ["v1.7.5.rc0", "v1.7.5-rc0"];
        let (catalog, warnings) = VersionCatalog::build(&tags).unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.tag_for(&Version::new("1.7.5.rc0")).unwrap().name,
            "v1.7.5-rc0"
        );
        assert_eq!(
            warnings,
            vec![RunWarning::TagCollision {
                tag: "v1.7.5.rc0".to_string(),
                existing: "v1.7.5-rc0".to_string(),
            }]
        );
    }

    #[test]
    fn test_empty_catalog() {
        let tags: [&str; 0] = [];
        let (catalog, _) = VersionCatalog::build(&tags).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_alias_resolve() {
        let aliases = AliasMap::builtin();
        assert_eq!(aliases.resolve(&Version::new("1.0.1")).as_str(), "1.0.0a");
        assert_eq!(aliases.resolve(&Version::new("v1.0.2")).as_str(), "1.0.0b");
        assert_eq!(aliases.resolve(&Version::new("1.0.0a")).as_str(), "1.0.0a");
        assert_eq!(aliases.resolve(&Version::new("1.7.5")).as_str(), "1.7.5");
    }

    #[test]
    fn test_builtin_aliases_fold_retagged_releases() {
        let tags = ["v1.0.0", "v1.0.0a", "v1.0.0b", "v1.0.1", "v1.0.2"];
        let (catalog, _) = VersionCatalog::build(&tags).unwrap();

        let all = AliasMap::builtin().canonicalize(catalog.versions().cloned().collect());
        assert_eq!(names(&all), vec!["1.0.0", "1.0.0a", "1.0.0b"]);

        let explicit = AliasMap::builtin().canonicalize(vec![Version::new("1.0.0a")]);
        assert_eq!(names(&explicit), vec!["1.0.0a"]);
    }

    #[test]
    fn test_canonicalize_keeps_first_occurrence() {
        let aliases = AliasMap::builtin();
        let input = ["1.0.0a", "1.0.1", "1.0.0", "1.0.2", "1.0.0b"]
            .iter()
            .map(|s| Version::new(s))
            .collect();

        assert_eq!(
            names(&aliases.canonicalize(input)),
            vec!["1.0.0a", "1.0.0", "1.0.0b"]
        );
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        let aliases = AliasMap::from_pairs([("1.0.1", "1.0.0a")]);
        let input: Vec<Version> = ["1.0.0", "1.0.1", "1.0.0a"]
            .iter()
            .map(|s| Version::new(s))
            .collect();

        let once = aliases.canonicalize(input);
        let twice = aliases.canonicalize(once.clone());
        assert_eq!(names(&once), names(&twice));
    }
}
