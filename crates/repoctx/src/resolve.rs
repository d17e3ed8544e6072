//! Base-repository resolution across a directory's git remotes.
//!
//! [`ResolvedRemotes`] holds the remote list in caller-preference order
//! together with its collaborators and answers two queries: which
//! repository is the base, and which ones accept pushes from the
//! viewer. The fork network is fetched from the forge at most once per
//! instance and cached for its lifetime.

use repoctx_api::Client;
use repoctx_api::errors::ApiError;
use repoctx_api::queries::repo::{RepoNetworkResult, Repository, repo_network};
use repoctx_core::repo::Repo;
use repoctx_core::{IOStreams, Prompter};
use repoctx_git::GitClient;
use repoctx_git::errors::GitError;
use repoctx_git::remote::Remote;

use crate::errors::ResolveError;

/// Cap on the number of remotes included in the network lookup.
///
/// Some working directories carry an unusually large remote list; the
/// query cost scales with remote count, so remotes beyond this cap are
/// silently left out of the lookup and contribute no forge-side signal
/// to base selection.
pub const MAX_REMOTES_FOR_LOOKUP: usize = 5;

/// Resolution hint value marking a remote's own repository as the base.
const BASE_RESOLUTION: &str = "base";

const BASE_PROMPT: &str =
    "Which should be the base repository (used for e.g. querying issues) for this directory?";

/// Forge-side lookup of the fork network for a set of repositories.
#[allow(async_fn_in_trait)]
pub trait NetworkLookup {
    /// Fetch each repository's record (self, parent, push capability)
    /// in a single request, positionally aligned with the inputs.
    async fn repo_network(&self, repos: &[Repo]) -> Result<RepoNetworkResult, ApiError>;
}

impl NetworkLookup for Client {
    async fn repo_network(&self, repos: &[Repo]) -> Result<RepoNetworkResult, ApiError> {
        repo_network(self, repos).await
    }
}

/// Persistence of per-remote resolution hints in git config.
#[allow(async_fn_in_trait)]
pub trait ResolutionStore {
    /// Record a resolution hint for the named remote.
    async fn set_remote_resolution(&self, name: &str, resolution: &str) -> Result<(), GitError>;

    /// Clear the resolution hint for the named remote.
    async fn unset_remote_resolution(&self, name: &str) -> Result<(), GitError>;
}

impl ResolutionStore for GitClient {
    async fn set_remote_resolution(&self, name: &str, resolution: &str) -> Result<(), GitError> {
        GitClient::set_remote_resolution(self, name, resolution).await
    }

    async fn unset_remote_resolution(&self, name: &str) -> Result<(), GitError> {
        GitClient::unset_remote_resolution(self, name).await
    }
}

/// A base-repository selection, possibly with a failed cache write.
///
/// When the user's choice cannot be written to git config, the
/// selection is still valid for the current invocation; callers must
/// not discard the repository just because `persist_error` is set.
#[derive(Debug)]
pub struct BaseRepo {
    /// The selected base repository.
    pub repo: Repo,
    /// Error from caching the choice to git config, if any.
    pub persist_error: Option<GitError>,
}

/// The remote list resolved against caller intent and the forge.
///
/// Construct via [`resolve_remotes_to_repos`]. A single instance
/// belongs to one logical task; the network cache is populated at most
/// once and repeated queries never re-issue the API call.
pub struct ResolvedRemotes<'a, A, S> {
    remotes: Vec<Remote>,
    api: &'a A,
    store: &'a S,
    prompter: &'a dyn Prompter,
    base_override: Option<Repo>,
    network: Option<RepoNetworkResult>,
}

impl<A, S> std::fmt::Debug for ResolvedRemotes<'_, A, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedRemotes")
            .field("remotes", &self.remotes)
            .field("base_override", &self.base_override)
            .field("network", &self.network)
            .finish_non_exhaustive()
    }
}

/// Prepare a remote list for base/head resolution.
///
/// `remotes` must already be in preference order (the enumeration layer
/// in `repoctx-git` sorts them); the order is preserved, and the first
/// remote is the fallback whenever no stronger signal exists. A
/// non-empty `base_override` wins over every other signal.
///
/// # Errors
///
/// Returns an error if `base_override` is not a valid `"owner/name"`
/// string.
pub fn resolve_remotes_to_repos<'a, A, S>(
    remotes: Vec<Remote>,
    api: &'a A,
    store: &'a S,
    prompter: &'a dyn Prompter,
    base_override: Option<&str>,
) -> Result<ResolvedRemotes<'a, A, S>, ResolveError> {
    let base_override = base_override.map(Repo::from_full_name).transpose()?;

    Ok(ResolvedRemotes {
        remotes,
        api,
        store,
        prompter,
        base_override,
        network: None,
    })
}

impl<A: NetworkLookup, S: ResolutionStore> ResolvedRemotes<'_, A, S> {
    /// The remote list, in preference order.
    pub fn remotes(&self) -> &[Remote] {
        &self.remotes
    }

    /// Determine the base repository for this directory.
    ///
    /// Signals are consulted in order: the caller's override, stored
    /// resolution hints, the non-interactive fallback (first remote),
    /// then the forge-side fork network with interactive
    /// disambiguation. An interactive choice is cached to git config;
    /// a failed cache write is reported alongside the selection.
    ///
    /// # Errors
    ///
    /// Returns an error when a stored hint fails to parse, the network
    /// lookup fails, or the user cancels the prompt.
    pub async fn base_repo(&mut self, io: &IOStreams) -> Result<BaseRepo, ResolveError> {
        if let Some(ref repo) = self.base_override {
            return Ok(BaseRepo {
                repo: repo.clone(),
                persist_error: None,
            });
        }

        // a resolution recorded on any remote is respected as-is
        if let Some(repo) = hinted_repo(&self.remotes)? {
            return Ok(BaseRepo {
                repo,
                persist_error: None,
            });
        }

        if !io.can_prompt() {
            return Ok(BaseRepo {
                repo: self.first_repo()?,
                persist_error: None,
            });
        }

        self.resolve_network().await?;
        let candidates = self
            .network
            .as_ref()
            .map_or_else(Vec::new, collect_candidates);

        if candidates.is_empty() {
            return Ok(BaseRepo {
                repo: self.first_repo()?,
                persist_error: None,
            });
        }

        let selected = self.pick_candidate(&candidates)?;
        let chosen = candidates[selected].repo();
        let (remote_name, resolution) = self.persist_target(&chosen, &candidates[selected]);

        let persist_error = self
            .store
            .set_remote_resolution(&remote_name, &resolution)
            .await
            .err();

        Ok(BaseRepo {
            repo: chosen,
            persist_error,
        })
    }

    /// Record a base-repository choice without returning it.
    ///
    /// When prompting is impossible, the first remote is marked as base
    /// unconditionally. Otherwise the fork network is consulted and the
    /// user's (or sole candidate's) choice is persisted.
    ///
    /// # Errors
    ///
    /// Returns an error when the network lookup fails or the user
    /// cancels the prompt. A failed config write is returned in the
    /// `Ok` value instead.
    pub async fn set_base_repo(&mut self, io: &IOStreams) -> Result<Option<GitError>, ResolveError> {
        if !io.can_prompt() {
            return Ok(self.mark_first_as_base().await);
        }

        self.resolve_network().await?;
        let candidates = self
            .network
            .as_ref()
            .map_or_else(Vec::new, collect_candidates);

        if candidates.is_empty() {
            return Ok(self.mark_first_as_base().await);
        }

        let selected = self.pick_candidate(&candidates)?;
        let chosen = candidates[selected].repo();
        let (remote_name, resolution) = self.persist_target(&chosen, &candidates[selected]);

        Ok(self
            .store
            .set_remote_resolution(&remote_name, &resolution)
            .await
            .err())
    }

    /// Repositories the viewer may push to, in network order.
    ///
    /// # Errors
    ///
    /// Returns an error if the network lookup fails.
    pub async fn head_repos(&mut self) -> Result<Vec<Repository>, ResolveError> {
        self.resolve_network().await?;
        Ok(self.network.as_ref().map_or_else(Vec::new, |network| {
            network
                .repositories
                .iter()
                .flatten()
                .filter(|repo| repo.viewer_can_push())
                .cloned()
                .collect()
        }))
    }

    /// Find the git remote that points to a repository.
    pub fn remote_for_repo(&self, repo: &Repo) -> Option<&Remote> {
        self.remotes
            .iter()
            .find(|remote| remote.repo.as_ref().is_some_and(|r| r.is_same(repo)))
    }

    /// Fetch the fork network once; later calls reuse the cache.
    async fn resolve_network(&mut self) -> Result<(), ResolveError> {
        if self.network.is_some() {
            return Ok(());
        }

        let lookups: Vec<Repo> = self
            .remotes
            .iter()
            .filter_map(|remote| remote.repo.clone())
            .take(MAX_REMOTES_FOR_LOOKUP)
            .collect();

        self.network = Some(self.api.repo_network(&lookups).await?);
        Ok(())
    }

    fn pick_candidate(&self, candidates: &[Repository]) -> Result<usize, ResolveError> {
        if candidates.len() == 1 {
            return Ok(0);
        }

        let names: Vec<String> = candidates.iter().map(Repository::full_name).collect();
        self.prompter
            .select(BASE_PROMPT, Some(0), &names)
            .map_err(ResolveError::Prompt)
    }

    /// Where to cache a selection: the matching remote gets `"base"`;
    /// a repository with no local remote is written by full name onto
    /// the first remote.
    fn persist_target(&self, chosen: &Repo, record: &Repository) -> (String, String) {
        match self.remote_for_repo(chosen) {
            Some(remote) => (remote.name.clone(), BASE_RESOLUTION.to_string()),
            None => (self.remotes[0].name.clone(), record.full_name()),
        }
    }

    async fn mark_first_as_base(&self) -> Option<GitError> {
        self.store
            .set_remote_resolution(&self.remotes[0].name, BASE_RESOLUTION)
            .await
            .err()
    }

    fn first_repo(&self) -> Result<Repo, ResolveError> {
        self.remotes
            .iter()
            .find_map(|remote| remote.repo.clone())
            .ok_or(ResolveError::NoRemotes)
    }
}

/// Offline base lookup: inspect resolution hints only.
///
/// # Errors
///
/// Returns [`ResolveError::NoDefault`] when no remote carries a hint,
/// or a parse error when a stored hint is not a valid full name.
pub fn get_base_repo(remotes: &[Remote]) -> Result<Repo, ResolveError> {
    hinted_repo(remotes)?.ok_or(ResolveError::NoDefault)
}

/// Clear the `"base"` hint from every remote that carries it.
///
/// Best-effort cleanup: errors from the store are ignored.
pub async fn remove_base_repo<S: ResolutionStore>(store: &S, remotes: &[Remote]) {
    for remote in remotes {
        if remote.resolved == BASE_RESOLUTION {
            let _ = store.unset_remote_resolution(&remote.name).await;
        }
    }
}

/// Scan remotes in order for a stored resolution.
///
/// `"base"` designates the remote's own repository; any other
/// non-empty value is parsed as a full name and paired with the
/// annotating remote's host.
fn hinted_repo(remotes: &[Remote]) -> Result<Option<Repo>, ResolveError> {
    for remote in remotes {
        if remote.resolved == BASE_RESOLUTION {
            if let Some(ref repo) = remote.repo {
                return Ok(Some(repo.clone()));
            }
        } else if !remote.resolved.is_empty() {
            let parsed = Repo::from_full_name(&remote.resolved)?;
            let host = remote
                .repo
                .as_ref()
                .map_or_else(|| parsed.host().to_string(), |r| r.host().to_string());
            return Ok(Some(Repo::with_host(parsed.owner(), parsed.name(), host)));
        }
    }
    Ok(None)
}

/// Candidate repositories in presentation order: each non-null network
/// entry contributes its parent first, then itself, deduplicated by
/// full name with first-seen order preserved.
fn collect_candidates(network: &RepoNetworkResult) -> Vec<Repository> {
    let mut candidates: Vec<Repository> = Vec::new();
    for entry in network.repositories.iter().flatten() {
        if let Some(ref parent) = entry.parent {
            push_unique(&mut candidates, parent);
        }
        push_unique(&mut candidates, entry);
    }
    candidates
}

fn push_unique(candidates: &mut Vec<Repository>, repo: &Repository) {
    if !candidates.iter().any(|c| c.full_name() == repo.full_name()) {
        candidates.push(repo.clone());
    }
}
