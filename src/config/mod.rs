//! Configuration for extraction runs
//!
//! `ExtractConfig` with serde defaults for every field, an optional TOML
//! file layer, and a fluent builder used by the CLI to apply flag overrides.

pub mod builder;
pub mod file;
pub mod types;

pub use builder::ExtractConfigBuilder;
pub use file::load_config;
pub use types::{BrowserSettings, CacheMode, CrawlSettings, ExtractConfig, RenderSettings};
