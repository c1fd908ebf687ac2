//! Version-specific source corrections.
//!
//! Old releases assume things about the build host that no longer hold (a dashed
//! `git-describe` on the PATH, headers pulled in implicitly). Each correction is a row in an
//! ordered rule table: a version range, an optional runtime gate, and the transformation to
//! perform. Rules are evaluated top to bottom and the first match wins, so at most one
//! correction is applied to any checkout.
//!
//! The ranges were found by building every release; nothing in the tree records them.

pub mod apply;

pub use apply::apply_rule;

use crate::domain::Version;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Commit carrying the missing-include fix, cherry-picked onto old releases.
/// Unverified abbreviated id; `[patches] header_fix_commit` overrides it.
pub const DEFAULT_HEADER_FIX_COMMIT: &str = "2fbd4f9";

/// Inclusive version range
#[derive(Debug, Clone, PartialEq)]
pub struct VersionRange {
    pub low: Version,
    pub high: Version,
}

impl VersionRange {
    pub fn new(low: &str, high: &str) -> Self {
        VersionRange {
            low: Version::new(low),
            high: Version::new(high),
        }
    }

    pub fn exact(version: &str) -> Self {
        Self::new(version, version)
    }

    pub fn contains(&self, version: &Version) -> bool {
        *version >= self.low && *version <= self.high
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.low == self.high {
            write!(f, "{}", self.low)
        } else {
            write!(f, "{}..={}", self.low, self.high)
        }
    }
}

/// Runtime condition that must also hold for a rule to apply
#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
    /// The command is missing or exits with failure on this host
    CommandBroken {
        program: &'static str,
        args: &'static [&'static str],
    },
}

/// Transformation performed on the checked-out tree
#[derive(Debug, Clone, PartialEq)]
pub enum PatchAction {
    /// Replace every occurrence of `from` with `to`, line by line
    Substitute {
        file: &'static str,
        from: &'static str,
        to: &'static str,
    },
    /// Rewrite the line assigning `variable` so it holds the exact version
    PinMakeVariable {
        file: &'static str,
        variable: &'static str,
    },
    /// Cherry-pick `commit` into the work tree, then force the version into `stamp_file`
    CherryPick {
        commit: String,
        stamp_file: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatchRule {
    pub name: &'static str,
    pub range: VersionRange,
    pub gate: Option<Gate>,
    pub action: PatchAction,
}

/// The fixed rule table, in priority order
pub fn builtin_rules(header_fix_commit: &str) -> Vec<PatchRule> {
    vec![
        PatchRule {
            name: "legacy-describe",
            range: VersionRange::new("1.0.10", "1.5.2.5"),
            gate: Some(Gate::CommandBroken {
                program: "git-describe",
                args: &["--abbrev=4", "HEAD"],
            }),
            action: PatchAction::Substitute {
                file: "GIT-VERSION-GEN",
                from: "git-describe",
                to: "git describe",
            },
        },
        PatchRule {
            name: "makefile-version",
            range: VersionRange::exact("1.0.9"),
            gate: None,
            action: PatchAction::PinMakeVariable {
                file: "Makefile",
                variable: "GIT_VERSION",
            },
        },
        PatchRule {
            name: "missing-header",
            range: VersionRange::new("1.0.0", "1.7.0.9"),
            gate: None,
            action: PatchAction::CherryPick {
                commit: header_fix_commit.to_string(),
                stamp_file: "version",
            },
        },
    ]
}

/// Host checks used to evaluate rule gates
pub trait SystemProbe {
    /// True when `program` cannot be run in `cwd` or exits with failure
    fn command_fails(&self, program: &str, args: &[&str], cwd: &Path) -> bool;
}

/// Probe that actually runs the command
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandProbe;

impl SystemProbe for CommandProbe {
    fn command_fails(&self, program: &str, args: &[&str], cwd: &Path) -> bool {
        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) => !status.success(),
            Err(e) => {
                debug!(program, error = %e, "probe command could not run");
                true
            }
        }
    }
}

/// Picks the correction, if any, for a version
pub struct PatchEngine {
    rules: Vec<PatchRule>,
    probe: Box<dyn SystemProbe>,
    workdir: PathBuf,
}

impl PatchEngine {
    /// Engine over `rules`; gates run their probes inside `workdir`
    pub fn new(rules: Vec<PatchRule>, probe: Box<dyn SystemProbe>, workdir: PathBuf) -> Self {
        PatchEngine {
            rules,
            probe,
            workdir,
        }
    }

    pub fn rules(&self) -> &[PatchRule] {
        &self.rules
    }

    /// First rule whose range contains `version` and whose gate (if any) holds.
    ///
    /// The gate is only probed once the range has matched.
    pub fn rule_for(&self, version: &Version) -> Option<&PatchRule> {
        self.rules
            .iter()
            .find(|rule| rule.range.contains(version) && self.gate_holds(rule.gate.as_ref()))
    }

    fn gate_holds(&self, gate: Option<&Gate>) -> bool {
        match gate {
            None => true,
            Some(Gate::CommandBroken { program, args }) => {
                let broken = self.probe.command_fails(program, args, &self.workdir);
                debug!(program, broken, "gate probed");
                broken
            }
        }
    }
}
