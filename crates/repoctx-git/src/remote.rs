//! Git remote parsing.

use url::Url;

use repoctx_core::repo::Repo;

use crate::client::RESOLVED_CONFIG;

/// A git remote annotated with its parsed repository identity and the
/// resolution hint previously stored in git config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    /// Remote name (e.g., "origin", "upstream").
    pub name: String,
    /// Fetch URL.
    pub fetch_url: String,
    /// Push URL, when it differs from the fetch URL.
    pub push_url: Option<String>,
    /// Repository identity parsed from the fetch URL, when recognizable.
    pub repo: Option<Repo>,
    /// Resolution hint: empty, `"base"`, or an `"owner/name"` string.
    ///
    /// Reflects the on-disk state at enumeration time; the resolver may
    /// rewrite the hint through [`crate::GitClient`] but never mutates
    /// this field.
    pub resolved: String,
}

impl Remote {
    /// Parse `git remote -v` output into a priority-sorted remote list.
    pub fn from_git_output(output: &str) -> Vec<Self> {
        let mut remotes: Vec<Self> = Vec::new();

        for line in output.lines() {
            let mut fields = line.split_whitespace();
            let (Some(name), Some(url_str), Some(direction)) =
                (fields.next(), fields.next(), fields.next())
            else {
                continue;
            };
            let direction = direction.trim_matches(|c| c == '(' || c == ')');

            if let Some(existing) = remotes.iter_mut().find(|r| r.name == name) {
                if direction == "push" && existing.fetch_url != url_str {
                    existing.push_url = Some(url_str.to_string());
                }
                continue;
            }

            remotes.push(Self {
                name: name.to_string(),
                fetch_url: url_str.to_string(),
                push_url: None,
                repo: repo_from_url(url_str),
                resolved: String::new(),
            });
        }

        sort_by_priority(&mut remotes);
        remotes
    }

    /// Fill the `resolved` hints from `git config --get-regexp` output.
    ///
    /// Lines have the form `remote.<name>.repoctx-resolved <value>`.
    pub fn fill_resolved(remotes: &mut [Self], config_output: &str) {
        let suffix = format!(".{RESOLVED_CONFIG}");
        for line in config_output.lines() {
            let Some((key, value)) = line.split_once(' ') else {
                continue;
            };
            let Some(remote_name) = key
                .strip_prefix("remote.")
                .and_then(|rest| rest.strip_suffix(&suffix))
            else {
                continue;
            };
            if let Some(remote) = remotes.iter_mut().find(|r| r.name == remote_name) {
                remote.resolved = value.to_string();
            }
        }
    }
}

/// Stable-sort remotes into preference order.
///
/// `upstream` outranks `github`, which outranks `origin`; all other
/// names keep their relative order at the end of the list.
pub fn sort_by_priority(remotes: &mut [Remote]) {
    remotes.sort_by_key(|r| priority(&r.name));
}

fn priority(name: &str) -> u8 {
    match name {
        "upstream" => 0,
        "github" => 1,
        "origin" => 2,
        _ => 3,
    }
}

/// Parse a git remote URL into a repository identity.
///
/// Understands scp-like SSH (`git@host:owner/name.git`), `ssh://`, and
/// HTTP(S) forms. Returns `None` for anything else.
pub fn repo_from_url(url_str: &str) -> Option<Repo> {
    if let Some(rest) = url_str.strip_prefix("git@") {
        let (host, path) = rest.split_once(':')?;
        let path = path.trim_end_matches(".git");
        let (owner, name) = path.split_once('/')?;
        if owner.is_empty() || name.is_empty() {
            return None;
        }
        // a trailing path segment after owner/name is tolerated
        let name = name.split('/').next().unwrap_or(name);
        return Some(Repo::with_host(owner, name, host));
    }

    if let Ok(u) = Url::parse(url_str)
        && matches!(u.scheme(), "ssh" | "http" | "https" | "git")
    {
        return Repo::from_url(&u).ok();
    }

    None
}
