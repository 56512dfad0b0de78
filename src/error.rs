//! Error taxonomy for extraction runs
//!
//! Every strategy converts whatever went wrong into one of these kinds and
//! reports it as a `Failure`. Nothing here ever crosses a strategy boundary
//! as a panic or an `anyhow::Error`.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for extraction operations
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Error kinds an extraction strategy can fail with
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// Navigation (or a follow-up page operation) exceeded its time budget
    #[error("{operation} timed out after {}s", .after.as_secs())]
    NavigationTimeout {
        operation: String,
        after: Duration,
    },

    /// Quality gate rejection
    #[error("content too thin: {length} chars, need more than {min}")]
    ContentTooThin { length: usize, min: usize },

    /// Locator exhausted its rules and the body/document fallback was empty
    #[error("no content region found")]
    NoRegionFound,

    /// The browser could not be found, downloaded or started
    #[error("browser launch failed: {0}")]
    BrowserLaunchFailure(String),

    /// The request itself is unusable (bad URL, bad override)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Anything a collaborator threw that fits no other kind
    #[error("unexpected fault: {0}")]
    UnknownFault(String),
}

impl ExtractError {
    /// Timeout helper used by the page operation wrappers
    #[must_use]
    pub fn timeout(operation: impl Into<String>, after: Duration) -> Self {
        Self::NavigationTimeout {
            operation: operation.into(),
            after,
        }
    }

    /// Short machine-friendly name of the error kind, used in log fields
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NavigationTimeout { .. } => "navigation_timeout",
            Self::ContentTooThin { .. } => "content_too_thin",
            Self::NoRegionFound => "no_region_found",
            Self::BrowserLaunchFailure(_) => "browser_launch_failure",
            Self::InvalidRequest(_) => "invalid_request",
            Self::UnknownFault(_) => "unknown_fault",
        }
    }
}

impl From<anyhow::Error> for ExtractError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} keeps the context chain
        Self::UnknownFault(format!("{err:#}"))
    }
}
