use crate::error::{GitVersionsError, Result};
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// What happens to the output of external commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Thrown away
    Discard,
    /// Collected and shown only when the command fails
    #[default]
    Capture,
    /// Streamed to stderr as it is produced, keeping stdout for results
    Forward,
}

impl OutputMode {
    /// Map `-q` / `-v` flags to an output mode
    pub fn from_verbosity(quiet: bool, verbose: u8) -> Self {
        if quiet {
            OutputMode::Discard
        } else if verbose > 0 {
            OutputMode::Forward
        } else {
            OutputMode::Capture
        }
    }
}

/// External build toolchain
pub trait BuildTool {
    /// Run `target` in `source`, installing under `prefix`
    fn run(&self, source: &Path, prefix: &Path, target: &str) -> Result<()>;
}

/// Drives git's own Makefile
#[derive(Debug, Clone)]
pub struct MakeBuildTool {
    pub program: String,
    pub jobs: Option<u32>,
    pub extra_args: Vec<String>,
    pub output: OutputMode,
}

impl Default for MakeBuildTool {
    fn default() -> Self {
        MakeBuildTool {
            program: "make".to_string(),
            jobs: None,
            extra_args: Vec::new(),
            output: OutputMode::default(),
        }
    }
}

impl MakeBuildTool {
    /// Arguments passed to make, in order
    pub fn args(&self, prefix: &Path, target: &str) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(jobs) = self.jobs.filter(|j| *j > 1) {
            args.push(format!("-j{}", jobs));
        }
        args.push(format!("prefix={}", prefix.display()));
        args.extend(self.extra_args.iter().cloned());
        args.push(target.to_string());
        args
    }
}

impl BuildTool for MakeBuildTool {
    fn run(&self, source: &Path, prefix: &Path, target: &str) -> Result<()> {
        let args = self.args(prefix, target);
        let command_line = format!("{} {}", self.program, args.join(" "));
        debug!(command = %command_line, cwd = %source.display(), "running");

        let mut cmd = Command::new(&self.program);
        cmd.args(&args).current_dir(source).stdin(Stdio::null());

        let (status, captured) = match self.output {
            OutputMode::Discard => {
                cmd.stdout(Stdio::null()).stderr(Stdio::null());
                (cmd.status(), String::new())
            }
            OutputMode::Forward => {
                cmd.stdout(Stdio::from(io::stderr()));
                (cmd.status(), String::new())
            }
            OutputMode::Capture => match cmd.output() {
                Ok(output) => {
                    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
                    text.push_str(&String::from_utf8_lossy(&output.stderr));
                    (Ok(output.status), text)
                }
                Err(e) => (Err(e), String::new()),
            },
        };

        let status = status.map_err(|e| {
            GitVersionsError::build(&command_line, format!("could not start: {}", e))
        })?;

        if !status.success() {
            return Err(GitVersionsError::build(&command_line, tail(&captured, 20)));
        }
        Ok(())
    }
}

/// Last `lines` lines of `text`
fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.trim_end().lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_order() {
        let tool = MakeBuildTool {
            jobs: Some(4),
            extra_args: vec!["NO_TCLTK=1".to_string()],
            ..Default::default()
        };
        assert_eq!(
            tool.args(Path::new("/opt/git/1.7.5"), "install"),
            vec!["-j4", "prefix=/opt/git/1.7.5", "NO_TCLTK=1", "install"]
        );
    }

    #[test]
    fn test_single_job_omits_flag() {
        let tool = MakeBuildTool {
            jobs: Some(1),
            ..Default::default()
        };
        assert_eq!(tool.args(Path::new("/d"), "all"), vec!["prefix=/d", "all"]);
    }

    #[test]
    fn test_output_mode_from_verbosity() {
        assert_eq!(OutputMode::from_verbosity(true, 2), OutputMode::Discard);
        assert_eq!(OutputMode::from_verbosity(false, 1), OutputMode::Forward);
        assert_eq!(OutputMode::from_verbosity(false, 0), OutputMode::Capture);
    }

    #[test]
    fn test_tail() {
        assert_eq!(tail("a\nb\nc\n", 2), "b\nc");
        assert_eq!(tail("a\n", 5), "a");
        assert_eq!(tail("", 5), "");
    }

    #[test]
    fn test_missing_program_names_command() {
        let tool = MakeBuildTool {
            program: "git-versions-no-such-make".to_string(),
            ..Default::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let err = tool.run(dir.path(), Path::new("/d"), "all").unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Build command failed: git-versions-no-such-make prefix=/d all"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command_is_build_error() {
        let tool = MakeBuildTool {
            program: "false".to_string(),
            output: OutputMode::Discard,
            ..Default::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let err = tool.run(dir.path(), Path::new("/d"), "install").unwrap_err();
        assert_eq!(err.to_string(), "Build command failed: false prefix=/d install");
    }
}
