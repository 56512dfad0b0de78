//! page-distill: print the main content of one web page
//!
//! Exit status: 0 on success, 1 when every strategy failed, 2 for usage
//! errors (missing or invalid URL, bad config).

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use page_distill::{ExtractConfig, ExtractionRequest, ExtractionResult, load_config};

const USAGE_ERROR: u8 = 2;
const EXTRACTION_FAILED: u8 = 1;

#[derive(Debug, Parser)]
#[command(name = "page-distill", version, about = "Extract the readable main content of a web page")]
struct Cli {
    /// Page to extract
    url: Option<String>,

    /// TOML config file
    #[arg(long, env = "PAGE_DISTILL_CONFIG")]
    config: Option<PathBuf>,

    /// Browser locale, e.g. en-US
    #[arg(long)]
    locale: Option<String>,

    /// IANA timezone, e.g. Europe/Berlin
    #[arg(long)]
    timezone: Option<String>,

    /// Navigation timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Wait after network idle, in milliseconds
    #[arg(long = "settle-ms")]
    settle_ms: Option<u64>,

    /// Show the browser window
    #[arg(long)]
    headful: bool,

    /// Skip the crawl strategy
    #[arg(long)]
    skip_crawl: bool,

    /// Skip the render strategy
    #[arg(long)]
    skip_render: bool,

    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// File config (if any) with flag overrides on top
    fn build_config(&self) -> Result<ExtractConfig> {
        let base = match &self.config {
            Some(path) => load_config(path)?,
            None => ExtractConfig::default(),
        };

        let mut builder = base.into_builder();
        if let Some(locale) = &self.locale {
            builder = builder.locale(locale.as_str());
        }
        if let Some(timezone) = &self.timezone {
            builder = builder.timezone(timezone.as_str());
        }
        if let Some(secs) = self.timeout {
            builder = builder.navigation_timeout_secs(secs);
        }
        if let Some(ms) = self.settle_ms {
            builder = builder.settle_delay_ms(ms);
        }
        if self.headful {
            builder = builder.headless(false);
        }
        if self.skip_crawl {
            builder = builder.crawl_enabled(false);
        }
        if self.skip_render {
            builder = builder.render_enabled(false);
        }
        builder.build().context("Invalid options")
    }

    fn build_request(&self) -> Result<ExtractionRequest> {
        let url = self
            .url
            .as_deref()
            .context("Missing URL. Usage: page-distill <URL> [options]")?;
        let mut request = ExtractionRequest::new(url)?;
        if let Some(secs) = self.timeout {
            request = request.with_timeout(Duration::from_secs(secs));
        }
        if let Some(locale) = &self.locale {
            request = request.with_locale(locale.as_str());
        }
        Ok(request)
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "page_distill=info"
    } else {
        "page_distill=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // The URL is checked before any config file is read
    let prepared = cli
        .build_request()
        .and_then(|request| cli.build_config().map(|config| (config, request)));
    let (config, request) = match prepared {
        Ok(prepared) => prepared,
        Err(e) => {
            println!("{e:#}");
            return ExitCode::from(USAGE_ERROR);
        }
    };

    tracing::info!(
        url = request.url_str(),
        timeout = ?request.timeout_or(config.navigation_timeout()),
        settle = ?config.settle_delay(),
        "Extracting"
    );

    match page_distill::extract(&request, &config).await {
        ExtractionResult::Success { text, strategy } => {
            tracing::info!(%strategy, "Extraction succeeded");
            println!("{text}");
            ExitCode::SUCCESS
        }
        ExtractionResult::Failure { strategy, reason } => {
            println!("Extraction failed (last strategy: {strategy}): {reason}");
            ExitCode::from(EXTRACTION_FAILED)
        }
    }
}
