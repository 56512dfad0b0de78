//! Timeout wrapper for page operations
//!
//! Keeps every browser call bounded so a strategy always completes.

use std::future::Future;
use std::time::Duration;

use crate::error::{ExtractError, ExtractResult};

/// Run `operation` under `timeout`, mapping expiry to `NavigationTimeout`
///
/// # Errors
/// The operation's own error, or `ExtractError::NavigationTimeout` naming
/// `operation_name` when the timeout fires first.
pub async fn with_page_timeout<F, T>(
    operation: F,
    timeout: Duration,
    operation_name: &str,
) -> ExtractResult<T>
where
    F: Future<Output = ExtractResult<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(ExtractError::timeout(operation_name, timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_within_budget() {
        let result = with_page_timeout(async { Ok(7) }, Duration::from_secs(1), "noop").await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_maps_to_navigation_timeout() {
        let result: ExtractResult<()> = with_page_timeout(
            async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            },
            Duration::from_secs(30),
            "Page navigation",
        )
        .await;
        assert_eq!(
            result,
            Err(ExtractError::timeout("Page navigation", Duration::from_secs(30)))
        );
    }
}
