//! Shared defaults for extraction runs
//!
//! Every tunable in `ExtractConfig` starts from one of these values, so the
//! CLI, the library entry points and the tests all agree on them.

/// Navigation timeout: 30 seconds
///
/// Applies to `page.goto()` plus the network-idle wait that follows it.
pub const DEFAULT_NAVIGATION_TIMEOUT_SECS: u64 = 30;

/// Settle delay after network idle: 3 seconds
///
/// Gives deferred client-side rendering a chance to populate the DOM before
/// the HTML is read back.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 3_000;

/// Quiet window that counts as "network idle"
///
/// Mirrors the usual `networkidle` definition: no new resource entries for
/// half a second.
pub const NETWORK_IDLE_QUIET_MS: u64 = 500;

/// Minimum length of pruned/fitted crawl output (chars, exclusive)
pub const DEFAULT_CRAWL_MIN_CHARS: usize = 100;

/// Minimum length of direct-render locator output (chars, exclusive)
pub const DEFAULT_RENDER_MIN_CHARS: usize = 50;

/// Minimum length a locator rule's text must exceed to be accepted
pub const DEFAULT_REGION_MIN_CHARS: usize = 50;

/// Pruning relevance threshold for the fitted output
///
/// Useful range is roughly 0.05 (keeps most text) to 0.48 (dense output).
pub const DEFAULT_PRUNE_THRESHOLD: f64 = 0.48;

/// Number of crawled pages kept by the in-memory crawl cache
pub const DEFAULT_CRAWL_CACHE_CAPACITY: usize = 32;

/// Default locale tag for the stealth profile
pub const DEFAULT_LOCALE: &str = "zh-CN";

/// Default timezone matching `DEFAULT_LOCALE`
pub const DEFAULT_TIMEZONE: &str = "Asia/Shanghai";

/// Fixed desktop viewport
pub const VIEWPORT_WIDTH: u32 = 1920;
pub const VIEWPORT_HEIGHT: u32 = 1080;

/// Chrome user agent string for stealth mode
///
/// Keep the major version in step with `CHROME_MAJOR_VERSION` so the
/// client-hint headers agree with the UA.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// Major version advertised in `Sec-CH-UA`
pub const CHROME_MAJOR_VERSION: &str = "132";

/// Tags removed by the crawl strategy before markdown rendering
pub const DEFAULT_EXCLUDED_TAGS: &[&str] = &[
    "nav", "footer", "aside", "header", "script", "style", "noscript", "form", "iframe",
];
