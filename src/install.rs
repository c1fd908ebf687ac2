//! Detection of already-installed versions.

use crate::domain::Version;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Answers whether a version is installed and working under a destination root.
///
/// Implementations never fail outward: anything that goes wrong while probing means
/// "not installed".
pub trait InstallChecker {
    fn is_installed(&self, version: &Version, destination: &Path) -> bool;
}

/// Directory a version is installed into
pub fn install_dir(destination: &Path, version: &Version) -> PathBuf {
    destination.join(version.as_str())
}

/// Path of the git binary for an installed version
pub fn installed_binary(destination: &Path, version: &Version) -> PathBuf {
    install_dir(destination, version).join("bin").join("git")
}

/// Extract the version from `git --version` output (e.g., "git version 1.7.5.rc0")
pub fn parse_reported_version(output: &str) -> Option<Version> {
    let line = output.lines().next()?.trim();
    let reported = line.strip_prefix("git version ")?.trim();
    if reported.is_empty() {
        return None;
    }
    Some(Version::new(reported))
}

/// Runs the installed binary and compares its self-reported version
#[derive(Debug, Default, Clone, Copy)]
pub struct BinaryInstallChecker;

impl InstallChecker for BinaryInstallChecker {
    fn is_installed(&self, version: &Version, destination: &Path) -> bool {
        let binary = installed_binary(destination, version);
        if !binary.is_file() {
            debug!(%version, binary = %binary.display(), "not installed: binary missing");
            return false;
        }

        let output = match Command::new(&binary)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                debug!(%version, error = %e, "not installed: probe failed to run");
                return false;
            }
        };

        if !output.status.success() {
            debug!(%version, status = %output.status, "not installed: probe exited with failure");
            return false;
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        match parse_reported_version(&stdout) {
            Some(reported) if reported == *version => true,
            Some(reported) => {
                debug!(%version, %reported, "not installed: version mismatch");
                false
            }
            None => {
                debug!(%version, output = %stdout.trim(), "not installed: unrecognized output");
                false
            }
        }
    }
}
