//! Resolver error types.

use repoctx_api::ApiError;
use repoctx_core::repo::RepoParseError;

/// Errors from base-repository resolution.
///
/// Persistence failures are deliberately absent here: writing the
/// user's choice to git config is reported alongside the selected
/// repository (see [`crate::BaseRepo`]), never instead of it.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ResolveError {
    /// A stored resolution hint or base override is not a valid
    /// `"owner/name"` string.
    #[error(transparent)]
    Parse(#[from] RepoParseError),

    /// The repository-network lookup failed.
    #[error("repository network lookup failed: {0}")]
    Network(#[from] ApiError),

    /// The interactive picker failed or was cancelled.
    #[error("base repository selection failed: {0}")]
    Prompt(#[source] anyhow::Error),

    /// No remote carries a resolution hint (offline lookup only).
    #[error("a default repository has not been set for this directory")]
    NoDefault,

    /// No remote points to a recognizable repository.
    #[error("none of the git remotes point to a known repository")]
    NoRemotes,
}
