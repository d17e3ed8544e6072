//! Repository identity: owner, name, and the host it lives on.

use std::fmt;

use url::Url;

use crate::instance::{self, GITHUB_COM};

/// A repository identified by owner, name, and host.
///
/// The host is normalized at construction. Derived equality is exact;
/// use [`Repo::is_same`] when comparing identities that may differ only
/// in letter case (forge logins are case-preserving but not
/// case-sensitive).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repo {
    owner: String,
    name: String,
    host: String,
}

impl Repo {
    /// Create a repo on the default host (github.com).
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            host: GITHUB_COM.to_string(),
        }
    }

    /// Create a repo on a specific host.
    pub fn with_host(
        owner: impl Into<String>,
        name: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            host: instance::normalize_hostname(&host.into()),
        }
    }

    /// Parse an `"OWNER/NAME"` string.
    ///
    /// Exactly one slash is accepted; empty components and embedded
    /// whitespace are rejected. The host defaults to github.com and can
    /// be replaced afterwards via [`Repo::with_host`].
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid `OWNER/NAME` pair.
    pub fn from_full_name(full_name: &str) -> Result<Self, RepoParseError> {
        let Some((owner, name)) = full_name.split_once('/') else {
            return Err(RepoParseError::InvalidFormat(full_name.to_string()));
        };

        if owner.is_empty()
            || name.is_empty()
            || name.contains('/')
            || owner.chars().any(char::is_whitespace)
            || name.chars().any(char::is_whitespace)
        {
            return Err(RepoParseError::InvalidFormat(full_name.to_string()));
        }

        Ok(Self::new(owner, name))
    }

    /// Extract a repository identity from a remote URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL has no host or fewer than two path
    /// segments.
    pub fn from_url(u: &Url) -> Result<Self, RepoParseError> {
        let host = u
            .host_str()
            .ok_or_else(|| RepoParseError::InvalidUrl(u.to_string()))?;

        let path = u.path().trim_start_matches('/').trim_end_matches(".git");
        let mut segments = path.split('/');
        match (segments.next(), segments.next()) {
            (Some(owner), Some(name)) if !owner.is_empty() && !name.is_empty() => {
                Ok(Self::with_host(owner, name, host))
            }
            _ => Err(RepoParseError::InvalidUrl(u.to_string())),
        }
    }

    /// Repository owner (user or organization login).
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hostname of the forge deployment this repo lives on.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Full name as `"OWNER/NAME"`. The host is carried separately.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Whether two identities denote the same repository.
    ///
    /// Owner, name, and host are all compared case-insensitively.
    pub fn is_same(&self, other: &Self) -> bool {
        self.owner.eq_ignore_ascii_case(&other.owner)
            && self.name.eq_ignore_ascii_case(&other.name)
            && self.host.eq_ignore_ascii_case(&other.host)
    }
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if instance::is_github_com(&self.host) {
            write!(f, "{}/{}", self.owner, self.name)
        } else {
            write!(f, "{}/{}/{}", self.host, self.owner, self.name)
        }
    }
}

/// Errors from parsing repository references.
#[derive(Debug, thiserror::Error)]
pub enum RepoParseError {
    /// String does not match the `OWNER/NAME` format.
    #[error("expected the \"OWNER/NAME\" format, got {0:?}")]
    InvalidFormat(String),
    /// URL does not contain repository information.
    #[error("cannot extract repository from URL: {0}")]
    InvalidUrl(String),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("octo/spoon", "octo", "spoon")]
    #[case("my-org/my.repo", "my-org", "my.repo")]
    #[case("u/repo_name", "u", "repo_name")]
    fn test_should_parse_owner_name(
        #[case] input: &str,
        #[case] owner: &str,
        #[case] name: &str,
    ) {
        let repo = Repo::from_full_name(input).unwrap();
        assert_eq!(repo.owner(), owner);
        assert_eq!(repo.name(), name);
        assert_eq!(repo.host(), "github.com");
    }

    #[rstest]
    #[case("just-a-name")]
    #[case("/repo")]
    #[case("owner/")]
    #[case("")]
    #[case("/")]
    #[case("a/b/c")]
    #[case("ghe.io/org/repo")]
    #[case("owner/na me")]
    #[case("own er/name")]
    #[case("owner/name\t")]
    fn test_should_reject_invalid_full_name(#[case] input: &str) {
        assert!(Repo::from_full_name(input).is_err());
    }

    #[test]
    fn test_should_include_input_in_parse_error() {
        let err = Repo::from_full_name("bad").unwrap_err();
        assert!(err.to_string().contains("bad"));
    }

    #[rstest]
    #[case("https://github.com/octo/spoon.git", "octo", "spoon", "github.com")]
    #[case("https://github.com/octo/spoon", "octo", "spoon", "github.com")]
    #[case("https://ghe.io/org/repo.git", "org", "repo", "ghe.io")]
    #[case("ssh://git@github.com/octo/spoon.git", "octo", "spoon", "github.com")]
    fn test_should_parse_url(
        #[case] url_str: &str,
        #[case] owner: &str,
        #[case] name: &str,
        #[case] host: &str,
    ) {
        let u = Url::parse(url_str).unwrap();
        let repo = Repo::from_url(&u).unwrap();
        assert_eq!(repo.owner(), owner);
        assert_eq!(repo.name(), name);
        assert_eq!(repo.host(), host);
    }

    #[test]
    fn test_should_reject_url_without_enough_path_segments() {
        let u = Url::parse("https://github.com/only-owner").unwrap();
        assert!(Repo::from_url(&u).is_err());
    }

    #[test]
    fn test_should_reject_url_without_host() {
        let u = Url::parse("file:///some/path").unwrap();
        assert!(Repo::from_url(&u).is_err());
    }

    #[test]
    fn test_should_compare_identities_case_insensitively() {
        let a = Repo::with_host("Octo", "Spoon", "GitHub.com");
        let b = Repo::with_host("octo", "spoon", "github.com");
        assert!(a.is_same(&b));
        assert!(b.is_same(&a));
    }

    #[test]
    fn test_should_distinguish_identities_by_host() {
        let a = Repo::new("octo", "spoon");
        let b = Repo::with_host("octo", "spoon", "ghe.io");
        assert!(!a.is_same(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_should_distinguish_identities_by_owner() {
        let a = Repo::new("octo", "spoon");
        let b = Repo::new("fork-owner", "spoon");
        assert!(!a.is_same(&b));
    }

    #[test]
    fn test_should_normalize_host_in_constructor() {
        let repo = Repo::with_host("org", "repo", "https://GHE.IO/");
        assert_eq!(repo.host(), "ghe.io");
    }

    #[test]
    fn test_should_display_default_host_repo_as_owner_name() {
        let repo = Repo::new("octo", "spoon");
        assert_eq!(repo.to_string(), "octo/spoon");
    }

    #[test]
    fn test_should_display_enterprise_repo_with_host() {
        let repo = Repo::with_host("org", "repo", "ghe.io");
        assert_eq!(repo.to_string(), "ghe.io/org/repo");
    }

    #[test]
    fn test_should_return_full_name_without_host() {
        let repo = Repo::with_host("org", "repo", "ghe.io");
        assert_eq!(repo.full_name(), "org/repo");
    }

    // --- property-based tests ---

    mod prop {
        use proptest::prelude::*;

        use super::super::*;

        proptest! {
            #[test]
            fn parse_roundtrips_owner_and_name(
                owner in "[a-zA-Z][a-zA-Z0-9-]{0,15}",
                name in "[a-zA-Z][a-zA-Z0-9._-]{0,15}",
            ) {
                let input = format!("{owner}/{name}");
                let repo = Repo::from_full_name(&input)?;
                prop_assert_eq!(repo.owner(), owner.as_str());
                prop_assert_eq!(repo.name(), name.as_str());
                prop_assert_eq!(repo.full_name(), input);
            }

            #[test]
            fn is_same_ignores_ascii_case(
                owner in "[a-zA-Z][a-zA-Z0-9]{0,10}",
                name in "[a-zA-Z][a-zA-Z0-9]{0,10}",
            ) {
                let lower = Repo::new(owner.to_lowercase(), name.to_lowercase());
                let upper = Repo::new(owner.to_uppercase(), name.to_uppercase());
                prop_assert!(lower.is_same(&upper));
            }
        }
    }
}
