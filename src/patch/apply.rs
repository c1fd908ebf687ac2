use crate::domain::Version;
use crate::error::{GitVersionsError, Result};
use crate::git::Repository;
use crate::patch::{PatchAction, PatchRule};
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::info;

/// Perform a rule's transformation on the tree checked out at `source`
pub fn apply_rule<R: Repository + ?Sized>(
    rule: &PatchRule,
    version: &Version,
    source: &Path,
    repo: &R,
) -> Result<()> {
    info!(rule = rule.name, %version, "applying source correction");

    match &rule.action {
        PatchAction::Substitute { file, from, to } => {
            rewrite_file(&source.join(file), |contents| {
                Ok(substitute_lines(contents, from, to))
            })
        }
        PatchAction::PinMakeVariable { file, variable } => {
            rewrite_file(&source.join(file), |contents| {
                pin_make_variable(contents, variable, version.as_str())
            })
        }
        PatchAction::CherryPick { commit, stamp_file } => {
            repo.cherry_pick_no_commit(commit).map_err(|e| match e {
                GitVersionsError::Patch(msg) => GitVersionsError::patch(format!(
                    "{} (set [patches] header_fix_commit to the header fix commit in this \
                     repository)",
                    msg
                )),
                other => other,
            })?;
            fs::write(source.join(stamp_file), format!("{}\n", version))?;
            Ok(())
        }
    }
}

fn rewrite_file<F>(path: &Path, transform: F) -> Result<()>
where
    F: FnOnce(&str) -> Result<String>,
{
    let before = fs::read_to_string(path).map_err(|e| {
        GitVersionsError::patch(format!("Cannot read {}: {}", path.display(), e))
    })?;
    let after = transform(&before)?;
    if after != before {
        fs::write(path, after)?;
    }
    Ok(())
}

/// Replace `from` with `to` on every line, keeping line endings intact
pub fn substitute_lines(contents: &str, from: &str, to: &str) -> String {
    contents
        .split_inclusive('\n')
        .map(|line| line.replace(from, to))
        .collect()
}

/// Rewrite the `variable = ...` assignment to `variable = version`; every other line is
/// emitted unchanged.
///
/// # Errors
/// A patch error when no line assigns `variable`.
pub fn pin_make_variable(contents: &str, variable: &str, version: &str) -> Result<String> {
    let assignment = Regex::new(&format!(r"^\s*{}\s*[:?]?=", regex::escape(variable)))?;
    let mut found = false;

    let rewritten: String = contents
        .split_inclusive('\n')
        .map(|line| {
            if assignment.is_match(line) {
                found = true;
                let ending = if line.ends_with('\n') { "\n" } else { "" };
                format!("{} = {}{}", variable, version, ending)
            } else {
                line.to_string()
            }
        })
        .collect();

    if !found {
        return Err(GitVersionsError::patch(format!(
            "No {} assignment to rewrite",
            variable
        )));
    }
    Ok(rewritten)
}
