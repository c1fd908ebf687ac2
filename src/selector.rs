//! The version selection pipeline.
//!
//! Stages run in a fixed order, each on the output of the previous one:
//! source list, alias substitution with de-duplication, pre-release filter,
//! install filter, range filter, limit, and finally validation against the catalog.

use crate::catalog::{AliasMap, VersionCatalog};
use crate::domain::Version;
use crate::error::{GitVersionsError, Result};
use crate::install::InstallChecker;
use std::path::Path;
use tracing::debug;

/// Which versions to start from
#[derive(Debug, Clone, PartialEq)]
pub enum VersionRequest {
    /// Every version in the catalog
    All,
    /// Versions named by the caller, as typed (tags or versions)
    Explicit(Vec<String>),
}

impl VersionRequest {
    /// `All` for an empty list, `Explicit` otherwise
    pub fn from_args(args: Vec<String>) -> Self {
        if args.is_empty() {
            VersionRequest::All
        } else {
            VersionRequest::Explicit(args)
        }
    }
}

/// Filter on installation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallFilter {
    #[default]
    Any,
    /// Keep only versions that are not installed yet
    MissingOnly,
    /// Keep only versions that are already installed
    InstalledOnly,
}

/// Everything that narrows the selection besides the request itself
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionCriteria {
    pub since: Option<Version>,
    pub until: Option<Version>,
    pub install_filter: InstallFilter,
    pub include_rc: bool,
    /// Positive keeps the most recent N, negative the most ancient |N|, zero keeps all
    pub limit: i64,
}

impl Default for SelectionCriteria {
    fn default() -> Self {
        SelectionCriteria {
            since: None,
            until: None,
            install_filter: InstallFilter::Any,
            include_rc: true,
            limit: 0,
        }
    }
}

/// Runs the selection pipeline against a catalog
pub struct VersionSelector<'a> {
    catalog: &'a VersionCatalog,
    aliases: &'a AliasMap,
    checker: &'a dyn InstallChecker,
    destination: &'a Path,
}

impl<'a> VersionSelector<'a> {
    pub fn new(
        catalog: &'a VersionCatalog,
        aliases: &'a AliasMap,
        checker: &'a dyn InstallChecker,
        destination: &'a Path,
    ) -> Self {
        VersionSelector {
            catalog,
            aliases,
            checker,
            destination,
        }
    }

    /// Produce the ordered list of versions to process.
    ///
    /// # Errors
    /// `UnknownVersions` naming every resulting version that is not in the catalog.
    pub fn select(
        &self,
        request: &VersionRequest,
        criteria: &SelectionCriteria,
    ) -> Result<Vec<Version>> {
        let mut versions = source_list(request, self.catalog);
        debug!(count = versions.len(), "source list");

        versions = self.aliases.canonicalize(versions);

        if !criteria.include_rc {
            versions.retain(|v| !v.is_prerelease());
        }

        match criteria.install_filter {
            InstallFilter::Any => {}
            InstallFilter::MissingOnly => {
                versions.retain(|v| !self.checker.is_installed(v, self.destination))
            }
            InstallFilter::InstalledOnly => {
                versions.retain(|v| self.checker.is_installed(v, self.destination))
            }
        }

        versions.retain(|v| in_range(v, criteria.since.as_ref(), criteria.until.as_ref()));

        let versions = apply_limit(versions, criteria.limit);
        debug!(count = versions.len(), "after filters");

        let unknown: Vec<String> = versions
            .iter()
            .filter(|v| !self.catalog.contains(v))
            .map(|v| v.to_string())
            .collect();
        if !unknown.is_empty() {
            return Err(GitVersionsError::UnknownVersions(unknown));
        }

        Ok(versions)
    }
}

fn source_list(request: &VersionRequest, catalog: &VersionCatalog) -> Vec<Version> {
    match request {
        VersionRequest::All => catalog.versions().cloned().collect(),
        VersionRequest::Explicit(requested) => {
            let mut versions: Vec<Version> = requested.iter().map(|r| Version::new(r)).collect();
            // Stable, so equal versions keep caller order for de-duplication
            versions.sort();
            versions
        }
    }
}

/// Whether `version` lies in the closed interval; unset bounds are unconstrained
pub fn in_range(version: &Version, since: Option<&Version>, until: Option<&Version>) -> bool {
    since.map_or(true, |low| version >= low) && until.map_or(true, |high| version <= high)
}

/// Keep the last `limit` entries for positive limits, the first `|limit|` for negative ones
pub fn apply_limit(mut versions: Vec<Version>, limit: i64) -> Vec<Version> {
    let count = usize::try_from(limit.unsigned_abs()).unwrap_or(usize::MAX);
    if limit > 0 {
        let start = versions.len().saturating_sub(count);
        versions.split_off(start)
    } else if limit < 0 {
        versions.truncate(count);
        versions
    } else {
        versions
    }
}
