//! Pure formatting functions for UI output.
//!
//! `format_*` functions build the text and are tested directly; `display_*` functions print it.

use crate::domain::Version;
use crate::orchestrator::{RunSummary, VersionOutcome, VersionState};
use crate::warning::RunWarning;
use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
///
/// Goes to stderr so stdout carries only results (version lists, TAP).
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Display a run warning to the user.
pub fn display_warning(warning: &RunWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Print selected versions, one per line, unstyled so the output can be piped
pub fn display_versions(versions: &[Version]) {
    for version in versions {
        println!("{}", version);
    }
}

/// TAP plan line
pub fn format_tap_plan(count: usize) -> String {
    format!("1..{}", count)
}

/// TAP result line; `index` is zero-based
pub fn format_tap_line(index: usize, outcome: &VersionOutcome) -> String {
    let number = index + 1;
    match (outcome.state, outcome.verified) {
        (VersionState::Skipped, _) => {
            format!("ok {} - git {} # SKIP already installed", number, outcome.version)
        }
        (_, Some(false)) => format!("not ok {} - git {}", number, outcome.version),
        _ => format!("ok {} - git {}", number, outcome.version),
    }
}

/// One line describing what happened to a version outside test mode
pub fn format_outcome(outcome: &VersionOutcome) -> String {
    if outcome.state == VersionState::Skipped {
        return format!("git {} is already installed", outcome.version);
    }
    match outcome.patch {
        Some(patch) => format!("Installed git {} (patched: {})", outcome.version, patch),
        None => format!("Installed git {}", outcome.version),
    }
}

pub fn display_outcome(outcome: &VersionOutcome) {
    if outcome.state == VersionState::Skipped {
        println!("{} {}", style("•").dim(), format_outcome(outcome));
    } else {
        display_success(&format_outcome(outcome));
    }
}

pub fn format_summary(summary: &RunSummary) -> String {
    let mut line = format!("{} built, {} skipped", summary.built(), summary.skipped());
    let failed = summary.failed_verifications();
    if !failed.is_empty() {
        let names: Vec<String> = failed.iter().map(|v| v.to_string()).collect();
        line.push_str(&format!(
            ", {} failed verification ({})",
            failed.len(),
            names.join(", ")
        ));
    }
    line
}

pub fn display_summary(summary: &RunSummary) {
    println!("\n{} {}", style("Summary:").bold(), format_summary(summary));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(version: &str, state: VersionState, verified: Option<bool>) -> VersionOutcome {
        VersionOutcome {
            version: Version::new(version),
            state,
            patch: None,
            verified,
        }
    }

    #[test]
    fn test_tap_lines() {
        assert_eq!(format_tap_plan(3), "1..3");
        assert_eq!(
            format_tap_line(0, &outcome("2.0.0", VersionState::Cleaned, Some(true))),
            "ok 1 - git 2.0.0"
        );
        assert_eq!(
            format_tap_line(1, &outcome("1.7.5.rc0", VersionState::Cleaned, Some(false))),
            "not ok 2 - git 1.7.5.rc0"
        );
        assert_eq!(
            format_tap_line(2, &outcome("2.1.0", VersionState::Skipped, None)),
            "ok 3 - git 2.1.0 # SKIP already installed"
        );
    }

    #[test]
    fn test_format_outcome() {
        let mut built = outcome("1.0.9", VersionState::Installed, None);
        assert_eq!(format_outcome(&built), "Installed git 1.0.9");
        built.patch = Some("makefile-version");
        assert_eq!(
            format_outcome(&built),
            "Installed git 1.0.9 (patched: makefile-version)"
        );
        assert_eq!(
            format_outcome(&outcome("2.0.0", VersionState::Skipped, None)),
            "git 2.0.0 is already installed"
        );
    }

    #[test]
    fn test_format_summary() {
        let summary = RunSummary {
            outcomes: vec![
                outcome("2.0.0", VersionState::Installed, None),
                outcome("2.1.0", VersionState::Skipped, None),
            ],
        };
        assert_eq!(format_summary(&summary), "1 built, 1 skipped");

        let summary = RunSummary {
            outcomes: vec![
                outcome("2.0.0", VersionState::Cleaned, Some(false)),
                outcome("2.1.0", VersionState::Cleaned, Some(true)),
            ],
        };
        assert_eq!(
            format_summary(&summary),
            "2 built, 0 skipped, 1 failed verification (2.0.0)"
        );
    }

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }
}
