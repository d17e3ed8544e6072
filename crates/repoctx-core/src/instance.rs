//! Hostname handling for different forge deployment types.
//!
//! A repository identity carries the host it lives on so that
//! github.com, GHE Server, and tenant deployments can coexist in one
//! remote list. Hostnames are normalized once, at construction time.

/// The default forge hostname.
pub const GITHUB_COM: &str = "github.com";

/// Local development alias that behaves like the cloud instance.
const LOCALHOST: &str = "github.localhost";

/// Normalize a hostname: strip protocol and trailing slashes, lowercase.
pub fn normalize_hostname(host: &str) -> String {
    let host = host
        .strip_prefix("https://")
        .or_else(|| host.strip_prefix("http://"))
        .unwrap_or(host);

    host.trim_end_matches('/').to_lowercase()
}

/// Whether a hostname refers to the cloud instance (github.com).
pub fn is_github_com(host: &str) -> bool {
    let normalized = normalize_hostname(host);
    normalized == GITHUB_COM || normalized == LOCALHOST
}

/// The GraphQL endpoint for a given hostname.
pub fn graphql_url(host: &str) -> String {
    let normalized = normalize_hostname(host);
    if is_github_com(&normalized) {
        "https://api.github.com/graphql".to_string()
    } else {
        format!("https://{normalized}/api/graphql")
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("GitHub.com", "github.com")]
    #[case("GITHUB.COM", "github.com")]
    #[case("https://github.com/", "github.com")]
    #[case("http://github.com/", "github.com")]
    #[case("https://forge.example.com", "forge.example.com")]
    #[case("https://ghe.io///", "ghe.io")]
    #[case("github.com/", "github.com")]
    fn test_should_normalize_hostname(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_hostname(input), expected);
    }

    #[rstest]
    #[case("github.com", true)]
    #[case("GitHub.Com", true)]
    #[case("github.localhost", true)]
    #[case("ghe.example.com", false)]
    fn test_should_detect_cloud_instance(#[case] host: &str, #[case] expected: bool) {
        assert_eq!(is_github_com(host), expected);
    }

    #[test]
    fn test_should_build_graphql_url_for_cloud() {
        assert_eq!(graphql_url("github.com"), "https://api.github.com/graphql");
    }

    #[test]
    fn test_should_build_graphql_url_for_enterprise() {
        assert_eq!(
            graphql_url("ghe.example.com"),
            "https://ghe.example.com/api/graphql",
        );
    }
}
