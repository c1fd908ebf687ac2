//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the handful of git operations the
//! build run needs, with a real implementation over `git2` and a mock for testing.
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! Most code should depend on the [Repository] trait rather than concrete implementations.
//!
//! ```rust
//! # use git_versions::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> git_versions::Result<()> {
//! let tags = repo.list_tags(Some("v[0-9]*"))?;
//! repo.reset_to_tag(&tags[0])?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Common git operation trait for abstraction
///
/// All methods return [crate::error::Result<T>]. Implementations map underlying errors
/// (like `git2::Error`) to the appropriate [crate::error::GitVersionsError] variants.
pub trait Repository {
    /// Get all tag names, optionally restricted to a glob pattern (e.g., "v[0-9]*")
    fn list_tags(&self, pattern: Option<&str>) -> Result<Vec<String>>;

    /// Force the work tree to the tag's commit.
    ///
    /// Local modifications are overwritten and untracked and ignored files are removed,
    /// leaving a tree identical to the tagged release. HEAD is detached at the commit.
    fn reset_to_tag(&self, tag: &str) -> Result<()>;

    /// Apply a commit's changes to the index and work tree without committing
    ///
    /// # Returns
    /// * `Ok(())` - The change applied cleanly
    /// * `Err` - If the commit cannot be resolved or the change conflicts
    fn cherry_pick_no_commit(&self, commit: &str) -> Result<()>;

    /// Fetch all tags from a remote (e.g., "origin")
    fn fetch_tags(&self, remote: &str) -> Result<()>;
}
