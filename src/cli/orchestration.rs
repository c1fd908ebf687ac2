//! Main workflow orchestration logic
//!
//! Runs everything between argument parsing and exit status: catalog, selection, then either
//! listing or building. Kept free of clap so it can be driven programmatically.

use crate::build::{BuildTool, MakeBuildTool, OutputMode};
use crate::catalog::{AliasMap, VersionCatalog};
use crate::config::Config;
use crate::domain::{Version, RELEASE_TAG_GLOB};
use crate::error::Result;
use crate::git::{Git2Repository, Repository};
use crate::install::{BinaryInstallChecker, InstallChecker};
use crate::orchestrator::{BuildOptions, BuildOrchestrator, RunSummary};
use crate::patch::{builtin_rules, CommandProbe, PatchEngine, SystemProbe};
use crate::selector::{InstallFilter, SelectionCriteria, VersionRequest, VersionSelector};
use crate::ui;
use crate::warning::RunWarning;
use std::env;
use std::path::{Path, PathBuf};
use tracing::info;

/// Remote refreshed by `--fetch`
pub const FETCH_REMOTE: &str = "origin";

const DEFAULT_SOURCE: &str = ".";
const DEFAULT_DESTINATION: &str = "./versions";

/// Arguments for the workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
/// `None` means "take it from the config file".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkflowArgs {
    pub source: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    /// Versions or tags named on the command line; empty means all
    pub versions: Vec<String>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub limit: i64,
    pub install_filter: InstallFilter,
    pub include_rc: Option<bool>,
    pub force: bool,
    /// Print the selection instead of building
    pub list: bool,
    pub fetch: bool,
    /// Build into a throwaway directory, verify, report TAP
    pub self_test: bool,
    pub docs: bool,
    pub jobs: Option<u32>,
    pub output: OutputMode,
}

/// Result of a completed workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// Versions chosen by the selection pipeline
    pub selected: Vec<Version>,
    /// `None` when only listing
    pub summary: Option<RunSummary>,
    pub warnings: Vec<RunWarning>,
}

impl WorkflowResult {
    /// False when any self-test verification failed
    pub fn succeeded(&self) -> bool {
        self.summary
            .as_ref()
            .map_or(true, |s| s.failed_verifications().is_empty())
    }
}

/// Collaborators that touch the system outside the git checkout
pub struct Toolchain<'a> {
    pub checker: &'a dyn InstallChecker,
    pub builder: &'a dyn BuildTool,
    pub probe: Box<dyn SystemProbe>,
}

/// Main workflow against the real checkout, `make` and installed binaries
///
/// # Errors
/// Configuration, git, patch and build errors, and `UnknownVersions` from selection.
pub fn run_workflow(args: &WorkflowArgs, config: &Config) -> Result<WorkflowResult> {
    let source = args
        .source
        .clone()
        .or_else(|| config.source.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE));
    let repo = Git2Repository::open(&source)?;

    let builder = MakeBuildTool {
        program: config.build.make.clone(),
        jobs: args.jobs.or(config.build.jobs),
        extra_args: config.build.extra_args.clone(),
        output: args.output,
    };
    let toolchain = Toolchain {
        checker: &BinaryInstallChecker,
        builder: &builder,
        probe: Box::new(CommandProbe),
    };

    run_with_repository(&repo, &source, args, config, toolchain)
}

/// Workflow over any repository and toolchain
pub fn run_with_repository<R: Repository + ?Sized>(
    repo: &R,
    source: &Path,
    args: &WorkflowArgs,
    config: &Config,
    toolchain: Toolchain<'_>,
) -> Result<WorkflowResult> {
    let mut warnings = Vec::new();

    if args.fetch {
        ui::display_status(&format!("Fetching tags from {}...", FETCH_REMOTE));
        if let Err(e) = repo.fetch_tags(FETCH_REMOTE) {
            warnings.push(RunWarning::FetchFailed {
                remote: FETCH_REMOTE.to_string(),
                reason: e.to_string(),
            });
        }
    }

    let tags = repo.list_tags(Some(RELEASE_TAG_GLOB))?;
    let (catalog, collisions) = VersionCatalog::build(&tags)?;
    warnings.extend(collisions);
    for warning in &warnings {
        ui::display_warning(warning);
    }
    info!(tags = tags.len(), versions = catalog.len(), "catalog built");

    // Held until the end of the run; dropping it removes the directory
    let scratch = if args.self_test {
        Some(tempfile::tempdir()?)
    } else {
        None
    };
    let destination = match &scratch {
        Some(dir) => dir.path().to_path_buf(),
        None => absolute(
            args.destination
                .clone()
                .or_else(|| config.destination.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DESTINATION)),
        )?,
    };

    let criteria = SelectionCriteria {
        since: args.since.as_deref().map(Version::new),
        until: args.until.as_deref().map(Version::new),
        install_filter: args.install_filter,
        include_rc: args.include_rc.unwrap_or(config.selection.include_rc),
        limit: args.limit,
    };
    let aliases = AliasMap::builtin();
    let selected = VersionSelector::new(&catalog, &aliases, toolchain.checker, &destination)
        .select(&VersionRequest::from_args(args.versions.clone()), &criteria)?;

    if args.list {
        ui::display_versions(&selected);
        return Ok(WorkflowResult {
            selected,
            summary: None,
            warnings,
        });
    }

    if selected.is_empty() && !args.self_test {
        ui::display_status("Nothing to build");
    }

    let engine = PatchEngine::new(
        builtin_rules(&config.patches.header_fix_commit),
        toolchain.probe,
        source.to_path_buf(),
    );
    let options = BuildOptions {
        source: source.to_path_buf(),
        destination,
        force: args.force,
        docs: args.docs,
        self_test: args.self_test,
        scrub_env: config.build.scrub_env.clone(),
    };

    if args.self_test {
        println!("{}", ui::format_tap_plan(selected.len()));
    }

    let orchestrator = BuildOrchestrator::new(
        repo,
        &catalog,
        &engine,
        toolchain.checker,
        toolchain.builder,
        &options,
    );
    let summary = orchestrator.run(&selected, |index, outcome| {
        if args.self_test {
            println!("{}", ui::format_tap_line(index, outcome));
        } else {
            ui::display_outcome(outcome);
        }
    })?;

    for version in summary.failed_verifications() {
        let warning = RunWarning::VerificationFailed {
            version: version.to_string(),
        };
        ui::display_warning(&warning);
        warnings.push(warning);
    }

    if !args.self_test && !selected.is_empty() {
        ui::display_summary(&summary);
    }

    Ok(WorkflowResult {
        selected,
        summary: Some(summary),
        warnings,
    })
}

/// `make` runs inside the checkout, so `prefix=` must not be relative
fn absolute(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(env::current_dir()?.join(path))
    }
}
