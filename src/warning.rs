use std::fmt;

/// Non-fatal issues found during a run.
/// These are reported to the user and the run continues.
#[derive(Debug, Clone, PartialEq)]
pub enum RunWarning {
    /// Two tags normalize to the same version; the later one is ignored
    TagCollision { tag: String, existing: String },
    /// Fetching tags failed, local tags are used instead
    FetchFailed { remote: String, reason: String },
    /// A freshly installed version did not report the expected version
    VerificationFailed { version: String },
}

impl fmt::Display for RunWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunWarning::TagCollision { tag, existing } => {
                write!(
                    f,
                    "Tag '{}' names the same version as '{}' and is ignored",
                    tag, existing
                )
            }
            RunWarning::FetchFailed { remote, reason } => {
                write!(
                    f,
                    "Could not fetch tags from remote '{}': {}. Using local tags.",
                    remote, reason
                )
            }
            RunWarning::VerificationFailed { version } => {
                write!(
                    f,
                    "git {} was installed but does not report its own version",
                    version
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_collision_display() {
        let warning = RunWarning::TagCollision {
            tag: "v1.7.5.rc0".to_string(),
            existing: "v1.7.5-rc0".to_string(),
        };
        let msg = warning.to_string();
        assert!(msg.contains("v1.7.5.rc0"));
        assert!(msg.contains("v1.7.5-rc0"));
    }

    #[test]
    fn test_fetch_failed_display() {
        let warning = RunWarning::FetchFailed {
            remote: "origin".to_string(),
            reason: "network unreachable".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "Could not fetch tags from remote 'origin': network unreachable. Using local tags."
        );
    }
}
