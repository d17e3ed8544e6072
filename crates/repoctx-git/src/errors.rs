//! Git-related error types.

/// Errors from git operations.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    /// Git command failed with an exit code.
    #[error("git {command} failed: {message}")]
    CommandFailed {
        /// The git subcommand that failed.
        command: String,
        /// Error message from stderr.
        message: String,
        /// Process exit code, if available.
        exit_code: Option<i32>,
    },

    /// Git binary not found.
    #[error("git executable not found in PATH")]
    NotFound,

    /// I/O error from the subprocess.
    #[error("git IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GitError {
    /// The exit code, if this was a command failure.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::CommandFailed { exit_code, .. } => *exit_code,
            Self::NotFound | Self::Io(_) => None,
        }
    }

    /// Whether the command exited with code 1 (for `git config`, the
    /// "key not present" case rather than a real failure).
    pub fn is_exit_code_1(&self) -> bool {
        self.exit_code() == Some(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_display_command_failed() {
        let err = GitError::CommandFailed {
            command: "config".to_string(),
            message: "could not lock config file".to_string(),
            exit_code: Some(255),
        };
        let msg = err.to_string();
        assert!(msg.contains("config"));
        assert!(msg.contains("could not lock"));
    }

    #[test]
    fn test_should_detect_exit_code_1() {
        let err = GitError::CommandFailed {
            command: "config".to_string(),
            message: String::new(),
            exit_code: Some(1),
        };
        assert!(err.is_exit_code_1());
        assert_eq!(err.exit_code(), Some(1));
    }

    #[test]
    fn test_should_not_report_exit_code_for_other_errors() {
        assert!(GitError::NotFound.exit_code().is_none());
        assert!(!GitError::NotFound.is_exit_code_1());
    }

    #[test]
    fn test_should_convert_io_error() {
        let io_err = std::io::Error::other("spawn failed");
        let err: GitError = io_err.into();
        assert!(matches!(err, GitError::Io(_)));
        assert!(err.to_string().contains("spawn failed"));
    }
}
