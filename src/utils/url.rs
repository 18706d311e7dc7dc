//! Joining backend base URLs with API paths.

/// Strips trailing slashes so paths can be appended safely.
///
/// ```
/// use crewterm::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://127.0.0.1:8080/v1/"), "http://127.0.0.1:8080/v1");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Appends `endpoint` to `base_url` with exactly one slash between them.
///
/// ```
/// use crewterm::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://127.0.0.1:8080/v1/", "/chat/completions"),
///     "http://127.0.0.1:8080/v1/chat/completions"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        normalize_base_url(base_url),
        endpoint.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_every_trailing_slash() {
        assert_eq!(normalize_base_url("http://localhost:8080/v1"), "http://localhost:8080/v1");
        assert_eq!(normalize_base_url("http://localhost:8080/v1///"), "http://localhost:8080/v1");
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn local_backend_paths() {
        let base = "http://127.0.0.1:8080/v1/";
        assert_eq!(construct_api_url(base, "models"), "http://127.0.0.1:8080/v1/models");
        assert_eq!(
            construct_api_url(base, "///chat/completions"),
            "http://127.0.0.1:8080/v1/chat/completions"
        );
    }
}
