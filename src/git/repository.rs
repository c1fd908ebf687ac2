use crate::error::{GitVersionsError, Result};
use git2::build::CheckoutBuilder;
use git2::{CherrypickOptions, FetchOptions, RemoteCallbacks, Repository as Git2Repo};
use std::path::Path;
use tracing::debug;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open the repository whose work tree is `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::open(path.as_ref()).map_err(|e| {
            GitVersionsError::config(format!(
                "{} is not a git checkout: {}",
                path.as_ref().display(),
                e.message()
            ))
        })?;

        if repo.is_bare() {
            return Err(GitVersionsError::config(format!(
                "{} is a bare repository; a work tree is needed to build",
                path.as_ref().display()
            )));
        }

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }
}

impl super::Repository for Git2Repository {
    fn list_tags(&self, pattern: Option<&str>) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(pattern)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn reset_to_tag(&self, tag: &str) -> Result<()> {
        let commit = self
            .repo
            .revparse_single(&format!("refs/tags/{}^{{commit}}", tag))?
            .peel_to_commit()?;

        let mut checkout = CheckoutBuilder::new();
        checkout.force().remove_untracked(true).remove_ignored(true);

        self.repo
            .checkout_tree(commit.as_object(), Some(&mut checkout))?;
        self.repo.set_head_detached(commit.id())?;
        self.repo.cleanup_state()?;

        debug!(tag, commit = %commit.id(), "work tree reset");
        Ok(())
    }

    fn cherry_pick_no_commit(&self, commit: &str) -> Result<()> {
        let target = self
            .repo
            .revparse_single(commit)
            .and_then(|object| object.peel_to_commit())
            .map_err(|e| {
                GitVersionsError::patch(format!("Cannot resolve commit '{}': {}", commit, e))
            })?;

        let mut options = CherrypickOptions::new();
        self.repo.cherrypick(&target, Some(&mut options))?;

        let conflicted = self.repo.index()?.has_conflicts();
        // Leaves the change in the index and work tree only, like `cherry-pick --no-commit`
        self.repo.cleanup_state()?;

        if conflicted {
            return Err(GitVersionsError::patch(format!(
                "Cherry-pick of {} conflicts with this release",
                commit
            )));
        }
        Ok(())
    }

    fn fetch_tags(&self, remote: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(remote)?;

        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
                {
                    return Ok(cred);
                }
            }
            git2::Cred::default()
        });

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(callbacks);

        remote.fetch(&["+refs/tags/*:refs/tags/*"], Some(&mut fetch_options), None)?;
        Ok(())
    }
}
