//! Config file and builder tests

use std::time::Duration;
use tempfile::TempDir;

use page_distill::config::{BrowserSettings, CacheMode};
use page_distill::{ExtractConfig, PruningOptions, ThresholdMode, load_config};

#[test]
fn test_serialized_config_loads_back() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("page-distill.toml");

    let config = ExtractConfig::builder()
        .locale("ja-JP")
        .timezone("Asia/Tokyo")
        .navigation_timeout_secs(45)
        .settle_delay_ms(1_500)
        .cache_mode(CacheMode::Bypass)
        .pruning(PruningOptions {
            threshold: 0.3,
            mode: ThresholdMode::Dynamic,
            min_word_threshold: Some(3),
        })
        .build()
        .unwrap();

    std::fs::write(&path, toml::to_string(&config).unwrap()).unwrap();
    let loaded = load_config(&path).unwrap();

    assert_eq!(loaded, config);
    assert_eq!(loaded.navigation_timeout(), Duration::from_secs(45));
    assert_eq!(loaded.settle_delay(), Duration::from_millis(1_500));
}

#[test]
fn test_browser_section() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("browser.toml");
    std::fs::write(
        &path,
        r#"
[browser]
headless = false
executable = "/opt/chrome/chrome"
extra_args = ["--proxy-server=http://127.0.0.1:8080"]
"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();

    assert_eq!(
        config.browser(),
        &BrowserSettings {
            headless: false,
            executable: Some("/opt/chrome/chrome".into()),
            extra_args: vec!["--proxy-server=http://127.0.0.1:8080".to_string()],
            request_timeout_secs: 30,
        }
    );
}

#[test]
fn test_unknown_cache_mode_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.toml");
    std::fs::write(&path, "[crawl]\ncache_mode = \"sometimes\"\n").unwrap();

    let err = load_config(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse config file"));
}

#[test]
fn test_disabling_everything_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("off.toml");
    std::fs::write(&path, "[crawl]\nenabled = false\n\n[render]\nenabled = false\n").unwrap();

    assert!(load_config(&path).is_err());
}

#[test]
fn test_cli_style_overrides_win_over_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("base.toml");
    std::fs::write(&path, "[stealth]\nlocale = \"de-DE\"\ntimezone = \"Europe/Berlin\"\n").unwrap();

    let config = load_config(&path)
        .unwrap()
        .into_builder()
        .locale("fr-FR")
        .crawl_enabled(false)
        .build()
        .unwrap();

    assert_eq!(config.stealth().locale, "fr-FR");
    assert_eq!(config.stealth().timezone, "Europe/Berlin");
    assert!(!config.crawl().enabled);
    assert!(config.render().enabled);
}
