//! Git operations.
//!
//! Everything shells out to the system `git` binary so the user's own git
//! config, hooks, and signing setup apply. Calls run one at a time.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::GitError;

/// Staged changes as git reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedChanges {
    /// Repository-relative paths, in git's order.
    pub files: Vec<String>,
    /// `git diff --cached` output.
    pub diff: String,
}

impl StagedChanges {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// The git operations a commit session needs.
#[async_trait]
pub trait GitRepo: Send + Sync {
    /// Fails when no usable `git` executable is on the PATH.
    async fn verify_installed(&self) -> Result<(), GitError>;

    /// Fails outside a work tree; returns the repository root otherwise.
    async fn verify_repository(&self) -> Result<PathBuf, GitError>;

    /// Staged file list and diff. No staged files is not an error here.
    async fn staged_changes(&self) -> Result<StagedChanges, GitError>;

    /// Creates a commit from the index with `message`.
    async fn commit(&self, message: &str) -> Result<(), GitError>;
}

/// [`GitRepo`] backed by the `git` executable in the working directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitCli;

impl GitCli {
    async fn run(&self, args: &[&str]) -> Result<String, GitError> {
        debug!(?args, "running git");
        let output = Command::new("git")
            .args(args)
            .output()
            .await
            .map_err(GitError::Spawn)?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl GitRepo for GitCli {
    async fn verify_installed(&self) -> Result<(), GitError> {
        self.run(&["--version"])
            .await
            .map(|_| ())
            .map_err(|e| GitError::NotInstalled(e.to_string()))
    }

    async fn verify_repository(&self) -> Result<PathBuf, GitError> {
        let root = self
            .run(&["rev-parse", "--show-toplevel"])
            .await
            .map_err(|e| GitError::NotARepository(e.to_string()))?;
        Ok(PathBuf::from(root.trim()))
    }

    async fn staged_changes(&self) -> Result<StagedChanges, GitError> {
        let names = self
            .run(&["diff", "--cached", "--diff-algorithm=minimal", "--name-only"])
            .await?;
        let files = parse_name_only(&names);
        if files.is_empty() {
            return Ok(StagedChanges::default());
        }

        let diff = self
            .run(&["diff", "--cached", "--diff-algorithm=minimal"])
            .await?;
        Ok(StagedChanges { files, diff })
    }

    async fn commit(&self, message: &str) -> Result<(), GitError> {
        self.run(&["commit", "-m", message])
            .await
            .map(|_| ())
            .map_err(|e| GitError::CommitFailed(e.to_string()))
    }
}

/// Splits `git diff --name-only` output into paths.
pub fn parse_name_only(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_only_skips_blank_lines() {
        let files = parse_name_only("src/main.rs\n\nCargo.toml\n");
        assert_eq!(files, vec!["src/main.rs", "Cargo.toml"]);
        assert!(parse_name_only("  \n").is_empty());
    }
}
