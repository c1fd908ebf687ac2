use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use git_versions::build::OutputMode;
use git_versions::cli::{run_workflow, WorkflowArgs};
use git_versions::config;
use git_versions::selector::InstallFilter;
use git_versions::ui;

#[derive(clap::Parser)]
#[command(
    name = "git-versions",
    version,
    about = "Build and install tagged releases of git side by side"
)]
struct Args {
    /// Versions or tags to build; all known releases when omitted
    versions: Vec<String>,

    #[arg(short, long, help = "Git checkout to build from")]
    source: Option<PathBuf>,

    #[arg(short, long, help = "Directory that receives one install per version")]
    destination: Option<PathBuf>,

    #[arg(long, value_name = "VERSION", help = "Oldest version to include")]
    since: Option<String>,

    #[arg(long, value_name = "VERSION", help = "Newest version to include")]
    until: Option<String>,

    #[arg(
        short = 'n',
        long,
        default_value_t = 0,
        allow_negative_numbers = true,
        help = "Keep the N most recent versions; negative keeps the N oldest"
    )]
    limit: i64,

    #[arg(long, conflicts_with = "installed", help = "Only versions not yet installed")]
    missing: bool,

    #[arg(long, help = "Only versions already installed")]
    installed: bool,

    #[arg(long, overrides_with = "no_rc", help = "Include release candidates")]
    rc: bool,

    #[arg(long, overrides_with = "rc", help = "Skip release candidates")]
    no_rc: bool,

    #[arg(short, long, help = "Rebuild versions that are already installed")]
    force: bool,

    #[arg(short, long, help = "Print the selected versions and exit")]
    list: bool,

    #[arg(long, help = "Fetch tags from origin first")]
    fetch: bool,

    #[arg(
        short,
        long,
        help = "Build, verify and remove each version in a scratch directory"
    )]
    test: bool,

    #[arg(long, help = "Also install documentation")]
    docs: bool,

    #[arg(short, long, help = "Parallel make jobs")]
    jobs: Option<u32>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, action = clap::ArgAction::Count, help = "More output (-vv for debug)")]
    verbose: u8,

    #[arg(short, long, conflicts_with = "verbose", help = "Only report errors")]
    quiet: bool,
}

impl Args {
    fn workflow_args(&self) -> WorkflowArgs {
        let install_filter = if self.missing {
            InstallFilter::MissingOnly
        } else if self.installed {
            InstallFilter::InstalledOnly
        } else {
            InstallFilter::Any
        };

        let include_rc = if self.no_rc {
            Some(false)
        } else if self.rc {
            Some(true)
        } else {
            None
        };

        WorkflowArgs {
            source: self.source.clone(),
            destination: self.destination.clone(),
            versions: self.versions.clone(),
            since: self.since.clone(),
            until: self.until.clone(),
            limit: self.limit,
            install_filter,
            include_rc,
            force: self.force,
            list: self.list,
            fetch: self.fetch,
            self_test: self.test,
            docs: self.docs,
            jobs: self.jobs,
            output: OutputMode::from_verbosity(self.quiet, self.verbose),
        }
    }
}

fn init_logging(quiet: bool, verbose: u8) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("git_versions={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Ok(false) when the run finished but a self-test verification failed
fn run(args: &Args) -> Result<bool> {
    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;
    let result = run_workflow(&args.workflow_args(), &config)?;
    Ok(result.succeeded())
}

fn main() {
    let args = Args::parse();
    init_logging(args.quiet, args.verbose);

    match run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}
