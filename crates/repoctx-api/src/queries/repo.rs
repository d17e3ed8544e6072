//! Repository-network query.
//!
//! A single GraphQL request that, for each input repository, returns
//! the repository itself, its fork parent (when it has one), and
//! whether the viewer may push to it. Inputs the forge does not expose
//! to the caller come back as null markers so results stay positionally
//! aligned with the inputs.

use std::collections::HashMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use repoctx_core::repo::Repo;

use crate::client::Client;
use crate::errors::ApiError;

/// Repository metadata returned by the network query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    /// Repository name.
    pub name: String,
    /// Owner login.
    pub owner: OwnerInfo,
    /// The viewer's permission on this repository, as reported by the
    /// forge (`ADMIN`, `MAINTAIN`, `WRITE`, `TRIAGE`, `READ`).
    #[serde(default)]
    pub viewer_permission: Option<String>,
    /// Default branch name.
    #[serde(default)]
    pub default_branch_ref: Option<BranchRef>,
    /// Whether the repo is private.
    #[serde(default)]
    pub is_private: bool,
    /// Parent repository, when this repo is a fork.
    #[serde(default)]
    pub parent: Option<Box<Repository>>,
    /// Hostname this record came from. Not part of the API payload;
    /// stamped after deserialization.
    #[serde(skip)]
    pub host: String,
}

/// Repository owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerInfo {
    /// Login name.
    pub login: String,
}

/// Branch reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchRef {
    /// Branch name.
    pub name: String,
}

impl Repository {
    /// Full name as `"owner/name"`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner.login, self.name)
    }

    /// The repository identity, including the host it was queried from.
    pub fn repo(&self) -> Repo {
        Repo::with_host(&self.owner.login, &self.name, &self.host)
    }

    /// Whether the viewer may push to this repository.
    pub fn viewer_can_push(&self) -> bool {
        matches!(
            self.viewer_permission.as_deref(),
            Some("ADMIN" | "MAINTAIN" | "WRITE")
        )
    }

    fn stamp_host(&mut self, host: &str) {
        self.host = host.to_string();
        if let Some(ref mut parent) = self.parent {
            parent.stamp_host(host);
        }
    }
}

/// Result of the network query, positionally aligned with its inputs.
#[derive(Debug, Clone, Default)]
pub struct RepoNetworkResult {
    /// One entry per input; `None` where the forge returned no data.
    pub repositories: Vec<Option<Repository>>,
}

/// Fields fetched for every repository in the network query.
const REPO_FRAGMENT: &str = "\
fragment repo on Repository {
  name
  owner { login }
  viewerPermission
  defaultBranchRef { name }
  isPrivate
}";

/// Build the aliased network query for the given repositories.
fn network_query(repos: &[Repo]) -> String {
    let mut selections = String::new();
    for (i, repo) in repos.iter().enumerate() {
        let _ = write!(
            selections,
            "\nrepo_{i:03}: repository(owner: {owner:?}, name: {name:?}) {{\n  ...repo\n  parent {{ ...repo }}\n}}",
            owner = repo.owner(),
            name = repo.name(),
        );
    }
    format!("{REPO_FRAGMENT}\nquery RepositoryNetwork {{{selections}\n}}")
}

/// Look up the fork network for a list of repositories in one request.
///
/// Result hostnames are stamped from the first input's host. Inputs the
/// caller cannot see come back as `None`; a partial result is not an
/// error.
///
/// # Errors
///
/// Returns an error if the transport fails or the forge rejects the
/// query outright.
pub async fn repo_network(client: &Client, repos: &[Repo]) -> Result<RepoNetworkResult, ApiError> {
    if repos.is_empty() {
        return Ok(RepoNetworkResult::default());
    }

    let query = network_query(repos);
    let data: Value = client.graphql(&query, &HashMap::new()).await?;

    let host = repos[0].host().to_string();
    let mut repositories = Vec::with_capacity(repos.len());
    for i in 0..repos.len() {
        let entry = data.get(format!("repo_{i:03}")).cloned().unwrap_or(Value::Null);
        if entry.is_null() {
            repositories.push(None);
        } else {
            let mut repository: Repository = serde_json::from_value(entry)?;
            repository.stamp_host(&host);
            repositories.push(Some(repository));
        }
    }

    Ok(RepoNetworkResult { repositories })
}
