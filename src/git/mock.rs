use crate::error::{GitVersionsError, Result};
use crate::git::Repository;
use std::cell::RefCell;

/// Mock repository for testing without actual git operations
///
/// Records every reset and cherry-pick so tests can assert on the sequence of operations.
#[derive(Default)]
pub struct MockRepository {
    tags: Vec<String>,
    resets: RefCell<Vec<String>>,
    cherry_picks: RefCell<Vec<String>>,
    fetches: RefCell<Vec<String>>,
    fail_fetch: bool,
    fail_cherry_pick: bool,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock repository holding the given tags
    pub fn with_tags<S: AsRef<str>>(tags: &[S]) -> Self {
        MockRepository {
            tags: tags.iter().map(|t| t.as_ref().to_string()).collect(),
            ..Self::default()
        }
    }

    /// Make every fetch fail
    pub fn failing_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    /// Make every cherry-pick fail as if the commit were not in the repository
    pub fn failing_cherry_pick(mut self) -> Self {
        self.fail_cherry_pick = true;
        self
    }

    pub fn resets(&self) -> Vec<String> {
        self.resets.borrow().clone()
    }

    pub fn cherry_picks(&self) -> Vec<String> {
        self.cherry_picks.borrow().clone()
    }

    pub fn fetches(&self) -> Vec<String> {
        self.fetches.borrow().clone()
    }
}

impl Repository for MockRepository {
    fn list_tags(&self, pattern: Option<&str>) -> Result<Vec<String>> {
        // Only a trailing `*` is understood, which is all the callers use
        let prefix = pattern.map(|p| p.trim_end_matches('*').replace("[0-9]", ""));
        Ok(self
            .tags
            .iter()
            .filter(|t| match &prefix {
                Some(prefix) => t.starts_with(prefix.as_str()),
                None => true,
            })
            .cloned()
            .collect())
    }

    fn reset_to_tag(&self, tag: &str) -> Result<()> {
        if !self.tags.iter().any(|t| t == tag) {
            return Err(GitVersionsError::Git(git2::Error::from_str(&format!(
                "revspec 'refs/tags/{}' not found",
                tag
            ))));
        }
        self.resets.borrow_mut().push(tag.to_string());
        Ok(())
    }

    fn cherry_pick_no_commit(&self, commit: &str) -> Result<()> {
        if self.fail_cherry_pick {
            return Err(GitVersionsError::patch(format!(
                "Cannot resolve commit '{}'",
                commit
            )));
        }
        self.cherry_picks.borrow_mut().push(commit.to_string());
        Ok(())
    }

    fn fetch_tags(&self, remote: &str) -> Result<()> {
        if self.fail_fetch {
            return Err(GitVersionsError::Git(git2::Error::from_str(
                "failed to resolve address",
            )));
        }
        self.fetches.borrow_mut().push(remote.to_string());
        Ok(())
    }
}
