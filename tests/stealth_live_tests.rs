//! Stealth checks against a real Chrome
//!
//! Run with `cargo test -- --ignored` on a machine with Chrome (or network
//! access for the managed download).

use anyhow::Result;
use std::time::Duration;

use page_distill::browser::{ChromiumLauncher, SessionLauncher, WaitUntil};
use page_distill::config::BrowserSettings;
use page_distill::{ExtractionRequest, StealthProfile};

const BLANK_PAGE: &str = "data:text/html,<html><body><p>stealth</p></body></html>";

#[tokio::test]
#[ignore = "requires a local Chrome"]
async fn test_evasions() -> Result<()> {
    let launcher = ChromiumLauncher::new(BrowserSettings::default());
    let profile = StealthProfile::default();
    let mut session = launcher.launch(Some(&profile)).await?;

    let outcome = async {
        // Init scripts only apply to documents created after injection
        session
            .navigate(BLANK_PAGE, WaitUntil::Load, Duration::from_secs(30))
            .await?;

        let webdriver = session.evaluate("navigator.webdriver").await?;
        assert!(
            webdriver.is_null() || webdriver == serde_json::Value::Bool(false),
            "navigator.webdriver leaked: {webdriver}"
        );

        let languages = session.evaluate("navigator.languages").await?;
        assert_eq!(languages, serde_json::json!(["zh-CN", "zh", "en"]));

        let plugins = session.evaluate("navigator.plugins.length").await?;
        assert!(plugins.as_u64().unwrap_or(0) > 0, "no plugins: {plugins}");

        let runtime = session.evaluate("typeof window.chrome.runtime").await?;
        assert_eq!(runtime, "object");

        let timezone = session
            .evaluate("Intl.DateTimeFormat().resolvedOptions().timeZone")
            .await?;
        assert_eq!(timezone, "Asia/Shanghai");

        let user_agent = session.evaluate("navigator.userAgent").await?;
        assert!(!user_agent.as_str().unwrap_or_default().contains("Headless"));
        Ok::<_, anyhow::Error>(())
    }
    .await;

    session.close().await;
    outcome
}

#[tokio::test]
#[ignore = "requires a local Chrome and network access"]
async fn test_extract_live_page() -> Result<()> {
    let request = ExtractionRequest::new("https://example.com/")?;
    let config = page_distill::ExtractConfig::builder()
        .locale("en-US")
        .timezone("America/New_York")
        .render_min_chars(20)
        .crawl_min_chars(20)
        .build()?;

    let result = page_distill::extract(&request, &config).await;

    let text = result.text().unwrap_or_default();
    assert!(text.contains("Example Domain"), "got {result:?}");
    Ok(())
}
