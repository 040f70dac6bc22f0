//! Joining server base URLs with endpoint paths.

/// Strip trailing slashes from a base URL.
///
/// ```
/// use rycode::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://127.0.0.1:4096//"), "http://127.0.0.1:4096");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Join `endpoint` onto `base_url` with exactly one slash between them.
///
/// ```
/// use rycode::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://127.0.0.1:4096/", "/config/providers"),
///     "http://127.0.0.1:4096/config/providers"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalize_base_url(base_url), endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_only_trailing_slashes() {
        assert_eq!(normalize_base_url("http://localhost:4096/api"), "http://localhost:4096/api");
        assert_eq!(normalize_base_url("http://localhost:4096/api/"), "http://localhost:4096/api");
        assert_eq!(normalize_base_url("///"), "");
        assert_eq!(normalize_base_url(""), "");
    }

    #[test]
    fn construct_joins_with_single_slash() {
        for (base, endpoint) in [
            ("http://localhost:4096/api", "config/providers"),
            ("http://localhost:4096/api/", "config/providers"),
            ("http://localhost:4096/api", "/config/providers"),
            ("http://localhost:4096/api///", "///config/providers"),
        ] {
            assert_eq!(
                construct_api_url(base, endpoint),
                "http://localhost:4096/api/config/providers",
                "base={base} endpoint={endpoint}"
            );
        }
    }
}
