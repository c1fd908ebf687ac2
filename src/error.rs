use thiserror::Error;

/// Unified error type for git-versions operations
#[derive(Error, Debug)]
pub enum GitVersionsError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown versions: {}", .0.join(", "))]
    UnknownVersions(Vec<String>),

    #[error("Patch failed: {0}")]
    Patch(String),

    #[error("Build command failed: {command}{}", fmt_detail(.detail))]
    Build { command: String, detail: String },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn fmt_detail(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!("\n{}", detail)
    }
}

/// Convenience type alias for Results in git-versions
pub type Result<T> = std::result::Result<T, GitVersionsError>;

impl GitVersionsError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitVersionsError::Config(msg.into())
    }

    /// Create a patch error with context
    pub fn patch(msg: impl Into<String>) -> Self {
        GitVersionsError::Patch(msg.into())
    }

    /// Create a build error naming the command that failed
    pub fn build(command: impl Into<String>, detail: impl Into<String>) -> Self {
        GitVersionsError::Build {
            command: command.into(),
            detail: detail.into(),
        }
    }
}
