//! Git client that wraps the git command-line tool.
//!
//! Only the operations the resolver needs are exposed: enumerating
//! remotes (with their resolution hints) and writing or clearing the
//! per-remote resolution hint in git config.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::instrument;

use crate::errors::GitError;
use crate::remote::Remote;

/// Config key suffix that stores the base-repository resolution for a
/// remote, as in `remote.<name>.repoctx-resolved`.
pub const RESOLVED_CONFIG: &str = "repoctx-resolved";

/// Client for executing git commands.
#[derive(Debug, Clone)]
pub struct GitClient {
    /// Path to the git binary.
    git_path: PathBuf,
    /// Working directory for git commands.
    repo_dir: Option<PathBuf>,
}

impl GitClient {
    /// Create a new git client using the system git.
    ///
    /// # Errors
    ///
    /// Returns an error if git is not found in PATH.
    pub fn new() -> Result<Self, GitError> {
        let git_path = which::which("git").map_err(|_| GitError::NotFound)?;

        Ok(Self {
            git_path,
            repo_dir: None,
        })
    }

    /// Set the working directory for subsequent commands.
    #[must_use]
    pub fn with_repo_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.repo_dir = Some(dir.into());
        self
    }

    /// The repository directory, if set.
    pub fn repo_dir(&self) -> Option<&Path> {
        self.repo_dir.as_deref()
    }

    /// Execute a git command and return stdout.
    #[instrument(skip(self), fields(args = ?args))]
    async fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let mut cmd = Command::new(&self.git_path);
        cmd.args(args);

        if let Some(ref dir) = self.repo_dir {
            cmd.current_dir(dir);
        }

        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd.output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let command = args.first().copied().unwrap_or("").to_string();
            return Err(GitError::CommandFailed {
                command,
                message: stderr.trim().to_string(),
                exit_code: output.status.code(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// List all remotes in preference order, with resolution hints.
    ///
    /// # Errors
    ///
    /// Returns an error if the git command fails.
    pub async fn remotes(&self) -> Result<Vec<Remote>, GitError> {
        let output = self.run(&["remote", "-v"]).await?;
        let mut remotes = Remote::from_git_output(&output);

        let pattern = format!(r"^remote\..*\.{RESOLVED_CONFIG}$");
        match self.run(&["config", "--get-regexp", &pattern]).await {
            Ok(config_output) => {
                Remote::fill_resolved(&mut remotes, &config_output);
            }
            Err(e) if e.is_exit_code_1() => {
                // no resolved remotes recorded
            }
            Err(e) => return Err(e),
        }

        Ok(remotes)
    }

    /// Record a resolution hint for a remote.
    ///
    /// Replaces any existing value, so repeated calls are safe.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the config fails.
    pub async fn set_remote_resolution(
        &self,
        name: &str,
        resolution: &str,
    ) -> Result<(), GitError> {
        let key = format!("remote.{name}.{RESOLVED_CONFIG}");
        self.run(&["config", "--replace-all", &key, resolution])
            .await?;
        Ok(())
    }

    /// Clear the resolution hint for a remote.
    ///
    /// # Errors
    ///
    /// Returns an error if clearing the config fails.
    pub async fn unset_remote_resolution(&self, name: &str) -> Result<(), GitError> {
        let key = format!("remote.{name}.{RESOLVED_CONFIG}");
        self.run(&["config", "--unset", &key]).await?;
        Ok(())
    }
}
