//! Per-version build sequencing.
//!
//! Each version moves through
//! `Pending -> (Skipped | Building -> Installed) -> [Verified -> Cleaned]`, one version at a
//! time. All versions share a single work tree, which is why they are never built
//! concurrently.

use crate::build::{BuildTool, ScopedEnv};
use crate::catalog::VersionCatalog;
use crate::domain::Version;
use crate::error::{GitVersionsError, Result};
use crate::git::Repository;
use crate::install::{install_dir, InstallChecker};
use crate::patch::{apply_rule, PatchEngine};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const BUILD_TARGET: &str = "all";
const INSTALL_TARGET: &str = "install";
const DOC_TARGET: &str = "install-doc";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionState {
    Pending,
    Skipped,
    Building,
    Installed,
    Verified,
    Cleaned,
}

impl VersionState {
    fn can_become(self, next: VersionState) -> bool {
        use VersionState::*;
        matches!(
            (self, next),
            (Pending, Skipped)
                | (Pending, Building)
                | (Building, Installed)
                | (Installed, Verified)
                | (Installed, Cleaned)
                | (Verified, Cleaned)
        )
    }
}

impl fmt::Display for VersionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersionState::Pending => "pending",
            VersionState::Skipped => "skipped",
            VersionState::Building => "building",
            VersionState::Installed => "installed",
            VersionState::Verified => "verified",
            VersionState::Cleaned => "cleaned",
        };
        write!(f, "{}", name)
    }
}

/// What happened to one version
#[derive(Debug, Clone, PartialEq)]
pub struct VersionOutcome {
    pub version: Version,
    pub state: VersionState,
    /// Name of the source correction applied, if any
    pub patch: Option<&'static str>,
    /// Self-test result; `None` outside self-test mode or when skipped
    pub verified: Option<bool>,
}

impl VersionOutcome {
    fn new(version: Version) -> Self {
        VersionOutcome {
            version,
            state: VersionState::Pending,
            patch: None,
            verified: None,
        }
    }

    fn transition(&mut self, next: VersionState) {
        debug_assert!(
            self.state.can_become(next),
            "invalid transition {} -> {}",
            self.state,
            next
        );
        debug!(version = %self.version, from = %self.state, to = %next, "state change");
        self.state = next;
    }

    pub fn was_built(&self) -> bool {
        !matches!(self.state, VersionState::Pending | VersionState::Skipped)
    }
}

/// Outcomes of a completed run, in processing order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub outcomes: Vec<VersionOutcome>,
}

impl RunSummary {
    pub fn built(&self) -> usize {
        self.outcomes.iter().filter(|o| o.was_built()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.state == VersionState::Skipped)
            .count()
    }

    pub fn failed_verifications(&self) -> Vec<&Version> {
        self.outcomes
            .iter()
            .filter(|o| o.verified == Some(false))
            .map(|o| &o.version)
            .collect()
    }
}

/// Settings for one orchestration run
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    /// Work tree of the git checkout
    pub source: PathBuf,
    /// Root under which each version gets its own directory
    pub destination: PathBuf,
    /// Rebuild even when the version is already installed
    pub force: bool,
    /// Also install documentation
    pub docs: bool,
    /// Verify each fresh install, then remove it
    pub self_test: bool,
    /// Environment variables hidden from the build
    pub scrub_env: Vec<String>,
}

impl BuildOptions {
    pub fn targets(&self) -> Vec<&'static str> {
        let mut targets = vec![BUILD_TARGET, INSTALL_TARGET];
        if self.docs {
            targets.push(DOC_TARGET);
        }
        targets
    }
}

/// Sequences checkout, patching, build, install and verification per version
pub struct BuildOrchestrator<'a, R: Repository + ?Sized> {
    repo: &'a R,
    catalog: &'a VersionCatalog,
    engine: &'a PatchEngine,
    checker: &'a dyn InstallChecker,
    builder: &'a dyn BuildTool,
    options: &'a BuildOptions,
}

impl<'a, R: Repository + ?Sized> BuildOrchestrator<'a, R> {
    pub fn new(
        repo: &'a R,
        catalog: &'a VersionCatalog,
        engine: &'a PatchEngine,
        checker: &'a dyn InstallChecker,
        builder: &'a dyn BuildTool,
        options: &'a BuildOptions,
    ) -> Self {
        BuildOrchestrator {
            repo,
            catalog,
            engine,
            checker,
            builder,
            options,
        }
    }

    /// Process `versions` in order, calling `on_outcome` after each one.
    ///
    /// # Errors
    /// The first git, patch or build failure ends the whole run; versions already installed
    /// stay in place.
    pub fn run<F>(&self, versions: &[Version], mut on_outcome: F) -> Result<RunSummary>
    where
        F: FnMut(usize, &VersionOutcome),
    {
        let mut summary = RunSummary::default();
        for (index, version) in versions.iter().enumerate() {
            let outcome = self.process(version)?;
            on_outcome(index, &outcome);
            summary.outcomes.push(outcome);
        }
        Ok(summary)
    }

    fn process(&self, version: &Version) -> Result<VersionOutcome> {
        let mut outcome = VersionOutcome::new(version.clone());
        let destination = self.options.destination.as_path();

        if !self.options.force && self.checker.is_installed(version, destination) {
            info!(%version, "already installed");
            outcome.transition(VersionState::Skipped);
            return Ok(outcome);
        }

        outcome.transition(VersionState::Building);
        let tag = self
            .catalog
            .tag_for(version)
            .ok_or_else(|| GitVersionsError::UnknownVersions(vec![version.to_string()]))?;
        self.repo.reset_to_tag(&tag.name)?;

        let prefix = install_dir(destination, version);
        remove_install(&prefix)?;

        if let Some(rule) = self.engine.rule_for(version) {
            apply_rule(rule, version, &self.options.source, self.repo)?;
            outcome.patch = Some(rule.name);
        }

        self.build_and_install(&prefix)?;
        outcome.transition(VersionState::Installed);
        info!(%version, prefix = %prefix.display(), "installed");

        if self.options.self_test {
            let passed = self.checker.is_installed(version, destination);
            outcome.verified = Some(passed);
            outcome.transition(VersionState::Verified);

            remove_install(&prefix)?;
            outcome.transition(VersionState::Cleaned);
        }

        Ok(outcome)
    }

    fn build_and_install(&self, prefix: &Path) -> Result<()> {
        let _env = ScopedEnv::scrub(&self.options.scrub_env);
        for target in self.options.targets() {
            self.builder.run(&self.options.source, prefix, target)?;
        }
        Ok(())
    }
}

fn remove_install(prefix: &Path) -> Result<()> {
    if prefix.exists() {
        debug!(prefix = %prefix.display(), "removing install directory");
        fs::remove_dir_all(prefix)?;
    }
    Ok(())
}
