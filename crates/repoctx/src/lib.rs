//! Resolve local git remotes to their hosted forge repositories.
//!
//! A working directory often carries several remotes pointing at
//! related repositories (a fork and its upstream, say). This crate
//! answers which of them is the *base* repository — the canonical one
//! for issue and pull-request queries — and which ones the current
//! user may push to.
//!
//! The decision consults, in order: an explicit override from the
//! caller, resolution hints previously cached in git config, the
//! forge-side fork network, and finally the user (when the terminal
//! allows prompting). Any interactive choice is written back to git
//! config so later invocations stay non-interactive.

pub mod errors;
pub mod resolve;

pub use errors::ResolveError;
pub use resolve::{
    BaseRepo, MAX_REMOTES_FOR_LOOKUP, NetworkLookup, ResolutionStore, ResolvedRemotes,
    get_base_repo, remove_base_repo, resolve_remotes_to_repos,
};
