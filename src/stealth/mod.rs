//! Stealth profile construction
//!
//! A `StealthProfile` is everything a browser session needs to look like an
//! ordinary desktop Chrome visit: user agent, viewport, locale and timezone,
//! navigation headers, and init scripts hiding automation signals.
//!
//! Building a profile is pure and cannot fail. Applying it to a live page is
//! the browser module's job.

mod scripts;

use serde::{Deserialize, Serialize};

use crate::utils::constants::{
    CHROME_MAJOR_VERSION, CHROME_USER_AGENT, DEFAULT_LOCALE, DEFAULT_TIMEZONE, VIEWPORT_HEIGHT,
    VIEWPORT_WIDTH,
};

/// Inputs to the profile builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StealthPolicy {
    pub user_agent: String,
    pub locale: String,
    pub timezone: String,
    pub platform: String,
}

impl Default for StealthPolicy {
    fn default() -> Self {
        Self {
            user_agent: CHROME_USER_AGENT.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            platform: "Win32".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// A named init-time script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitScript {
    pub name: &'static str,
    pub source: String,
}

/// Browser session fingerprint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StealthProfile {
    pub user_agent: String,
    pub viewport: Viewport,
    pub locale: String,
    pub timezone: String,
    pub platform: String,
    pub accept_language: String,
    /// `navigator.languages`, most preferred first
    pub languages: Vec<String>,
    /// Extra request headers, in send order
    pub extra_headers: Vec<(String, String)>,
    /// Init scripts, in injection order
    pub init_scripts: Vec<InitScript>,
}

impl Default for StealthProfile {
    fn default() -> Self {
        Self::build(&StealthPolicy::default())
    }
}

impl StealthProfile {
    /// Build the profile for `policy`
    #[must_use]
    pub fn build(policy: &StealthPolicy) -> Self {
        let languages = languages_for(&policy.locale);
        let accept_language = accept_language_for(&languages);

        let extra_headers = navigation_headers(&accept_language, &policy.platform);
        let init_scripts = init_scripts(&languages);

        Self {
            user_agent: policy.user_agent.clone(),
            viewport: Viewport {
                width: VIEWPORT_WIDTH,
                height: VIEWPORT_HEIGHT,
            },
            locale: policy.locale.clone(),
            timezone: policy.timezone.clone(),
            platform: policy.platform.clone(),
            accept_language,
            languages,
            extra_headers,
            init_scripts,
        }
    }

    /// Header value by case-insensitive name
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.extra_headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Headers as a JSON object, the shape CDP's `Network.setExtraHTTPHeaders` takes
    #[must_use]
    pub fn headers_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .extra_headers
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();
        serde_json::Value::Object(map)
    }
}

/// `zh-CN` → `["zh-CN", "zh", "en"]`, `en-US` → `["en-US", "en"]`
fn languages_for(locale: &str) -> Vec<String> {
    let locale = locale.trim();
    if locale.is_empty() {
        return vec!["en-US".to_string(), "en".to_string()];
    }

    let mut languages = vec![locale.to_string()];
    let primary = locale.split(['-', '_']).next().unwrap_or(locale);
    if primary != locale {
        languages.push(primary.to_string());
    }
    if !primary.eq_ignore_ascii_case("en") {
        languages.push("en".to_string());
    }
    languages
}

/// q-values step down by 0.1 from the second entry
fn accept_language_for(languages: &[String]) -> String {
    languages
        .iter()
        .enumerate()
        .map(|(i, lang)| match i {
            0 => lang.clone(),
            _ => {
                let q = 10usize.saturating_sub(i).max(1);
                format!("{lang};q=0.{q}")
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn navigation_headers(accept_language: &str, platform: &str) -> Vec<(String, String)> {
    let platform_hint = match platform {
        p if p.starts_with("Mac") => "\"macOS\"",
        p if p.starts_with("Linux") => "\"Linux\"",
        _ => "\"Windows\"",
    };

    let pairs: [(&str, String); 11] = [
        (
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8"
                .to_string(),
        ),
        ("Accept-Language", accept_language.to_string()),
        ("Cache-Control", "max-age=0".to_string()),
        ("Upgrade-Insecure-Requests", "1".to_string()),
        ("Sec-Fetch-Dest", "document".to_string()),
        ("Sec-Fetch-Mode", "navigate".to_string()),
        ("Sec-Fetch-Site", "none".to_string()),
        ("Sec-Fetch-User", "?1".to_string()),
        (
            "Sec-CH-UA",
            format!(
                "\"Not A(Brand\";v=\"8\", \"Chromium\";v=\"{CHROME_MAJOR_VERSION}\", \"Google Chrome\";v=\"{CHROME_MAJOR_VERSION}\""
            ),
        ),
        ("Sec-CH-UA-Mobile", "?0".to_string()),
        ("Sec-CH-UA-Platform", platform_hint.to_string()),
    ];

    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

// Order matters: webdriver first, chrome.runtime before anything probing it
fn init_scripts(languages: &[String]) -> Vec<InitScript> {
    let languages_json = serde_json::to_string(languages).unwrap_or_else(|_| "[\"en-US\"]".to_string());
    let primary_json = languages
        .first()
        .and_then(|l| serde_json::to_string(l).ok())
        .unwrap_or_else(|| "\"en-US\"".to_string());

    vec![
        InitScript {
            name: "navigator_webdriver",
            source: scripts::NAVIGATOR_WEBDRIVER.to_string(),
        },
        InitScript {
            name: "navigator_plugins",
            source: scripts::NAVIGATOR_PLUGINS.to_string(),
        },
        InitScript {
            name: "navigator_languages",
            source: scripts::navigator_languages(&languages_json, &primary_json),
        },
        InitScript {
            name: "chrome_runtime",
            source: scripts::CHROME_RUNTIME.to_string(),
        },
        InitScript {
            name: "navigator_permissions",
            source: scripts::NAVIGATOR_PERMISSIONS.to_string(),
        },
        InitScript {
            name: "webgl_vendor",
            source: scripts::WEBGL_VENDOR.to_string(),
        },
    ]
}
