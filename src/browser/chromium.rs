//! Chromium sessions over CDP (chromiumoxide)

use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::cdp::browser_protocol::emulation::{
    SetDeviceMetricsOverrideParams, SetLocaleOverrideParams, SetTimezoneOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::network::{
    Headers, SetExtraHttpHeadersParams, SetUserAgentOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use futures::StreamExt;
use futures::future::BoxFuture;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use super::js_scripts::{NAVIGATION_STATUS, NETWORK_IDLE_PROBE};
use super::profile_dir::{BrowserProfile, create_unique_profile};
use super::setup::{BASE_CHROME_ARGS, resolve_browser_executable};
use super::timeout::with_page_timeout;
use super::{NavigationResponse, PageSession, SessionLauncher, WaitUntil};
use crate::config::BrowserSettings;
use crate::error::{ExtractError, ExtractResult};
use crate::stealth::StealthProfile;
use crate::utils::constants::{
    CHROME_USER_AGENT, NETWORK_IDLE_QUIET_MS, VIEWPORT_HEIGHT, VIEWPORT_WIDTH,
};

/// Upper bound for `Browser.close` and process reaping
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Poll interval of the network-idle probe
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(100);

fn cdp_fault(err: impl std::fmt::Display) -> ExtractError {
    ExtractError::UnknownFault(format!("CDP error: {err}"))
}

fn launch_failure(err: impl std::fmt::Display) -> ExtractError {
    ExtractError::BrowserLaunchFailure(err.to_string())
}

/// Launches a fresh Chrome process per session
#[derive(Debug, Clone, Default)]
pub struct ChromiumLauncher {
    settings: BrowserSettings,
}

impl ChromiumLauncher {
    #[must_use]
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }

    async fn launch_session(
        &self,
        stealth: Option<&StealthProfile>,
    ) -> ExtractResult<ChromiumSession> {
        let chrome_path = resolve_browser_executable(self.settings.executable.as_deref())
            .await
            .map_err(|e| launch_failure(format!("{e:#}")))?;

        let profile_dir = create_unique_profile().map_err(|e| launch_failure(format!("{e:#}")))?;
        let request_timeout = Duration::from_secs(self.settings.request_timeout_secs);

        let mut config_builder = BrowserConfigBuilder::default()
            .request_timeout(request_timeout)
            .window_size(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
            .user_data_dir(profile_dir.path().to_path_buf())
            .chrome_executable(chrome_path);

        if self.settings.headless {
            config_builder = config_builder.headless_mode(HeadlessMode::default());
        } else {
            config_builder = config_builder.with_head();
        }

        for arg in BASE_CHROME_ARGS {
            config_builder = config_builder.arg(*arg);
        }

        let user_agent = stealth.map_or(CHROME_USER_AGENT, |p| p.user_agent.as_str());
        config_builder = config_builder.arg(format!("--user-agent={user_agent}"));
        if let Some(profile) = stealth {
            config_builder = config_builder.arg(format!("--lang={}", profile.locale));
        }
        for arg in &self.settings.extra_args {
            config_builder = config_builder.arg(arg.as_str());
        }

        let browser_config = config_builder
            .build()
            .map_err(|e| launch_failure(format!("Failed to build browser config: {e}")))?;

        info!(stealth = stealth.is_some(), "Launching browser");
        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| launch_failure(format!("Failed to launch browser: {e}")))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    let error_msg = e.to_string();

                    // Chrome sends CDP events chromiumoxide doesn't know about
                    let is_benign_serialization_error = error_msg
                        .contains("data did not match any variant of untagged enum Message")
                        || error_msg.contains("Failed to deserialize WS response");

                    if is_benign_serialization_error {
                        trace!("Suppressed benign CDP serialization error: {}", error_msg);
                    } else {
                        error!("Browser handler error: {:?}", e);
                    }
                }
            }
            debug!("Browser handler task completed");
        });

        let mut session = ChromiumSession {
            browser: Some(browser),
            handler: Some(handler_task),
            page: None,
            profile_dir: Some(profile_dir),
            request_timeout,
        };

        let page = match session.new_blank_page().await {
            Ok(page) => page,
            Err(e) => {
                session.shutdown().await;
                return Err(launch_failure(format!("Failed to create page: {e}")));
            }
        };

        if let Some(profile) = stealth {
            // Stealth failure shouldn't block the render
            if let Err(e) = apply_stealth_profile(&page, profile).await {
                warn!("Failed to apply stealth profile: {e}");
            }
        }

        session.page = Some(page);
        Ok(session)
    }
}

impl SessionLauncher for ChromiumLauncher {
    fn launch<'a>(
        &'a self,
        stealth: Option<&'a StealthProfile>,
    ) -> BoxFuture<'a, ExtractResult<Box<dyn PageSession>>> {
        Box::pin(async move {
            let session = self.launch_session(stealth).await?;
            Ok(Box::new(session) as Box<dyn PageSession>)
        })
    }
}

/// Apply a stealth profile to a blank page, before the first navigation
///
/// Init scripts are registered for every new document. Each CDP override is
/// best-effort; only a total script injection failure is an error.
pub async fn apply_stealth_profile(page: &Page, profile: &StealthProfile) -> ExtractResult<()> {
    let mut injected = 0usize;
    for script in &profile.init_scripts {
        let result = page
            .execute(AddScriptToEvaluateOnNewDocumentParams {
                source: script.source.clone(),
                include_command_line_api: None,
                world_name: None,
                run_immediately: None,
            })
            .await;
        match result {
            Ok(_) => {
                trace!("Injected: {}", script.name);
                injected += 1;
            }
            Err(e) => warn!("Failed to inject {}: {}", script.name, e),
        }
    }

    if let Err(e) = page
        .execute(SetUserAgentOverrideParams {
            user_agent: profile.user_agent.clone(),
            accept_language: Some(profile.accept_language.clone()),
            platform: Some(profile.platform.clone()),
            user_agent_metadata: None,
        })
        .await
    {
        warn!("Failed to override user agent: {e}");
    }

    if let Err(e) = page
        .execute(SetExtraHttpHeadersParams::new(Headers::new(
            profile.headers_json(),
        )))
        .await
    {
        warn!("Failed to set extra HTTP headers: {e}");
    }

    if let Err(e) = page
        .execute(SetTimezoneOverrideParams::new(profile.timezone.clone()))
        .await
    {
        warn!("Failed to override timezone {}: {e}", profile.timezone);
    }

    if let Err(e) = page
        .execute(SetLocaleOverrideParams {
            locale: Some(profile.locale.clone()),
        })
        .await
    {
        warn!("Failed to override locale {}: {e}", profile.locale);
    }

    let metrics = SetDeviceMetricsOverrideParams::builder()
        .width(i64::from(profile.viewport.width))
        .height(i64::from(profile.viewport.height))
        .device_scale_factor(1.0)
        .mobile(false)
        .build()
        .map_err(ExtractError::UnknownFault)?;
    if let Err(e) = page.execute(metrics).await {
        warn!("Failed to set viewport: {e}");
    }

    debug!(
        "Stealth profile applied: {}/{} scripts active",
        injected,
        profile.init_scripts.len()
    );

    if injected == 0 && !profile.init_scripts.is_empty() {
        return Err(ExtractError::UnknownFault(
            "Failed to inject any stealth scripts".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct IdleProbe {
    #[serde(rename = "readyState")]
    ready_state: String,
    resources: u64,
}

/// Poll until the document is complete and no new resource entries have
/// appeared for the quiet window. Unbounded; callers wrap it in a timeout.
async fn wait_for_network_idle(page: &Page) -> ExtractResult<()> {
    let quiet = Duration::from_millis(NETWORK_IDLE_QUIET_MS);
    let start = Instant::now();
    let mut last_count: Option<u64> = None;
    let mut stable_since = Instant::now();

    loop {
        match page.evaluate(NETWORK_IDLE_PROBE).await {
            Ok(result) => match result.into_value::<IdleProbe>() {
                Ok(probe) if probe.ready_state == "complete" => {
                    if last_count == Some(probe.resources) {
                        if stable_since.elapsed() >= quiet {
                            debug!(
                                "Network idle after {:.2}s ({} resources)",
                                start.elapsed().as_secs_f64(),
                                probe.resources
                            );
                            return Ok(());
                        }
                    } else {
                        last_count = Some(probe.resources);
                        stable_since = Instant::now();
                    }
                }
                Ok(_) => last_count = None,
                Err(e) => trace!("Unreadable idle probe result: {e}"),
            },
            // Execution context may be swapped out mid-navigation
            Err(e) => trace!("Idle probe failed, retrying: {e}"),
        }

        tokio::time::sleep(IDLE_POLL_INTERVAL).await;
    }
}

async fn navigation_status(page: &Page) -> Option<u16> {
    let result = page.evaluate(NAVIGATION_STATUS).await.ok()?;
    result.into_value::<Option<u16>>().ok().flatten()
}

/// A Chrome process with one page
///
/// Fields are `Option` so `close()` can move them out while `Drop` still
/// sees what was left behind.
pub struct ChromiumSession {
    browser: Option<Browser>,
    handler: Option<JoinHandle<()>>,
    page: Option<Page>,
    profile_dir: Option<BrowserProfile>,
    request_timeout: Duration,
}

impl ChromiumSession {
    fn page(&self) -> ExtractResult<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| ExtractError::UnknownFault("browser session already closed".to_string()))
    }

    async fn new_blank_page(&self) -> ExtractResult<Page> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| ExtractError::UnknownFault("browser session already closed".to_string()))?;
        browser.new_page("about:blank").await.map_err(cdp_fault)
    }

    async fn shutdown(&mut self) {
        self.page.take();

        if let Some(mut browser) = self.browser.take() {
            match tokio::time::timeout(CLOSE_TIMEOUT, browser.close()).await {
                Ok(Ok(_)) => debug!("Browser closed"),
                Ok(Err(e)) => warn!("Browser close failed: {e}"),
                Err(_) => warn!("Browser close timed out after {:?}", CLOSE_TIMEOUT),
            }
            match tokio::time::timeout(CLOSE_TIMEOUT, browser.wait()).await {
                Ok(Ok(_)) => debug!("Browser process exited"),
                Ok(Err(e)) => warn!("Waiting for browser exit failed: {e}"),
                Err(_) => warn!("Browser did not exit within {:?}", CLOSE_TIMEOUT),
            }
            // Dropping the Browser kills the process if it is still alive
        }

        if let Some(handler) = self.handler.take() {
            handler.abort();
        }

        // Removes the user data dir now that Chrome released it
        self.profile_dir.take();
    }
}

impl PageSession for ChromiumSession {
    fn navigate<'a>(
        &'a mut self,
        url: &'a str,
        wait_until: WaitUntil,
        timeout: Duration,
    ) -> BoxFuture<'a, ExtractResult<NavigationResponse>> {
        Box::pin(async move {
            let page = self.page()?;
            with_page_timeout(
                async {
                    page.goto(url).await.map_err(cdp_fault)?;
                    if wait_until == WaitUntil::NetworkIdle {
                        wait_for_network_idle(page).await?;
                    }
                    Ok(())
                },
                timeout,
                "Page navigation",
            )
            .await?;

            let status = navigation_status(page).await;
            debug!(url, ?status, "Navigation finished");
            Ok(NavigationResponse { status })
        })
    }

    fn evaluate<'a>(
        &'a mut self,
        script: &'a str,
    ) -> BoxFuture<'a, ExtractResult<serde_json::Value>> {
        Box::pin(async move {
            let page = self.page()?;
            let result = with_page_timeout(
                async { page.evaluate(script).await.map_err(cdp_fault) },
                self.request_timeout,
                "Script evaluation",
            )
            .await?;
            // Scripts without a return value come back empty
            Ok(result
                .into_value::<serde_json::Value>()
                .unwrap_or(serde_json::Value::Null))
        })
    }

    fn content(&mut self) -> BoxFuture<'_, ExtractResult<String>> {
        Box::pin(async move {
            let page = self.page()?;
            with_page_timeout(
                async { page.content().await.map_err(cdp_fault) },
                self.request_timeout,
                "Content retrieval",
            )
            .await
        })
    }

    fn close(self: Box<Self>) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            let mut session = self;
            session.shutdown().await;
        })
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
        if let Some(browser) = self.browser.take() {
            warn!("Browser session dropped without close() - killing browser");
            drop(browser);
        }
        self.profile_dir.take();
    }
}
