//! Browser session capability
//!
//! Strategies talk to the browser only through [`SessionLauncher`] and
//! [`PageSession`]. The production implementation drives Chrome over CDP with
//! chromiumoxide; tests substitute scripted doubles.
//!
//! A session is a scoped resource: whoever launches one must call
//! [`PageSession::close`] on every exit path. The Chromium session also kills
//! the browser in `Drop` if that never happens.

mod chromium;
pub mod js_scripts;
pub mod profile_dir;
pub mod setup;
pub mod timeout;

pub use chromium::{ChromiumLauncher, ChromiumSession, apply_stealth_profile};
pub use setup::{download_managed_browser, find_browser_executable, resolve_browser_executable};
pub use timeout::with_page_timeout;

use futures::future::BoxFuture;
use std::time::Duration;

use crate::error::ExtractResult;
use crate::stealth::StealthProfile;

/// When a navigation counts as finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    /// The `load` event fired
    Load,
    /// `load` fired and no new network activity for a quiet window
    NetworkIdle,
}

/// Outcome of a successful navigation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationResponse {
    /// Main document HTTP status, if the browser reported one
    pub status: Option<u16>,
}

/// Fully rendered page HTML, consumed right after retrieval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub html: String,
    pub status: Option<u16>,
}

/// One open browser page
pub trait PageSession: Send {
    /// Navigate and wait per `wait_until`, bounded by `timeout`
    fn navigate<'a>(
        &'a mut self,
        url: &'a str,
        wait_until: WaitUntil,
        timeout: Duration,
    ) -> BoxFuture<'a, ExtractResult<NavigationResponse>>;

    /// Evaluate a script in the page, returning its JSON value (null if none)
    fn evaluate<'a>(&'a mut self, script: &'a str)
    -> BoxFuture<'a, ExtractResult<serde_json::Value>>;

    /// Current serialized DOM
    fn content(&mut self) -> BoxFuture<'_, ExtractResult<String>>;

    /// Release the session; never fails
    fn close(self: Box<Self>) -> BoxFuture<'static, ()>;
}

/// Starts browser sessions
pub trait SessionLauncher: Send + Sync {
    /// Launch a session, applying `stealth` when given
    fn launch<'a>(
        &'a self,
        stealth: Option<&'a StealthProfile>,
    ) -> BoxFuture<'a, ExtractResult<Box<dyn PageSession>>>;
}
