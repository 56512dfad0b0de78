//! Extraction request

use std::time::Duration;

use url::Url;

use crate::error::{ExtractError, ExtractResult};
use crate::utils::url_utils::parse_http_url;

/// One page to extract, with optional per-run overrides
///
/// Immutable once built; the `with_*` methods consume and return a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    url: Url,
    timeout: Option<Duration>,
    locale: Option<String>,
}

impl ExtractionRequest {
    /// Validate `url` as an absolute http(s) URL
    ///
    /// # Errors
    /// `ExtractError::InvalidRequest` for anything else.
    pub fn new(url: &str) -> ExtractResult<Self> {
        let parsed = parse_http_url(url).ok_or_else(|| {
            ExtractError::InvalidRequest(format!("not an absolute http(s) URL: {url:?}"))
        })?;
        Ok(Self {
            url: parsed,
            timeout: None,
            locale: None,
        })
    }

    /// Override the navigation timeout for this run
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the stealth locale for this run (blank is ignored)
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        let locale = locale.into();
        let locale = locale.trim();
        self.locale = (!locale.is_empty()).then(|| locale.to_string());
        self
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn url_str(&self) -> &str {
        self.url.as_str()
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    #[must_use]
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Request override, or `default`
    #[must_use]
    pub fn timeout_or(&self, default: Duration) -> Duration {
        self.timeout.unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(ExtractionRequest::new("https://example.com/a?b=1").is_ok());
        assert!(ExtractionRequest::new("http://localhost:8080/").is_ok());
    }

    #[test]
    fn test_rejects_non_http() {
        for bad in ["", "   ", "example.com", "/relative", "ftp://example.com", "javascript:alert(1)"] {
            let err = ExtractionRequest::new(bad).expect_err(bad);
            assert_eq!(err.kind(), "invalid_request", "{bad}");
        }
    }

    #[test]
    fn test_overrides() {
        let request = ExtractionRequest::new("https://example.com")
            .expect("valid url")
            .with_timeout(Duration::from_secs(5))
            .with_locale(" en-US ");
        assert_eq!(request.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(request.locale(), Some("en-US"));
        assert_eq!(request.timeout_or(Duration::from_secs(30)), Duration::from_secs(5));

        let request = request.with_locale("  ");
        assert_eq!(request.locale(), None);
    }
}
