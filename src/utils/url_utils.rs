//! URL validation helpers.

use url::Url;

/// Parse an absolute `http`/`https` URL, rejecting everything else
///
/// `data:`, `javascript:`, `mailto:` and relative references all yield `None`.
#[must_use]
pub fn parse_http_url(url: &str) -> Option<Url> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => {
            Some(parsed)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        let parsed = parse_http_url("  https://example.com/a?b=c ").expect("https url");
        assert_eq!(parsed.host_str(), Some("example.com"));
        assert!(parse_http_url("http://localhost:8080/").is_some());
    }

    #[test]
    fn test_rejects_other_schemes_and_relative() {
        assert!(parse_http_url("").is_none());
        assert!(parse_http_url("data:text/html,<p>x</p>").is_none());
        assert!(parse_http_url("javascript:alert(1)").is_none());
        assert!(parse_http_url("mailto:someone@example.com").is_none());
        assert!(parse_http_url("/relative/path").is_none());
        assert!(parse_http_url("example.com").is_none());
    }
}
