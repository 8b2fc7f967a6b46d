use crate::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Default upper bound for a condition wait
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default delay between two condition checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Bounded polling strategy for page conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl WaitConfig {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Timeout error for `what`, used when a wait is mandatory
    pub fn timeout_error(&self, what: impl Into<String>) -> Error {
        Error::Timeout {
            what: what.into(),
            timeout_ms: self.timeout.as_millis(),
        }
    }
}

/// Poll `condition` until it holds or the timeout elapses.
///
/// Returns `Ok(false)` on timeout. The condition is always checked at least
/// once; errors it returns end the wait immediately.
pub async fn poll_until<F, Fut>(config: &WaitConfig, mut condition: F) -> Result<bool>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let deadline = Instant::now() + config.timeout;

    loop {
        if condition().await? {
            return Ok(true);
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(false);
        }

        tokio::time::sleep(config.poll_interval.min(deadline - now)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_poll_until_succeeds_after_retries() {
        let calls = Cell::new(0);
        let config = WaitConfig::new(Duration::from_secs(5))
            .with_poll_interval(Duration::from_millis(1));

        let result = poll_until(&config, || {
            calls.set(calls.get() + 1);
            let ready = calls.get() >= 3;
            async move { Ok(ready) }
        })
        .await
        .unwrap();

        assert!(result);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_poll_until_times_out() {
        let config = WaitConfig::new(Duration::from_millis(20))
            .with_poll_interval(Duration::from_millis(5));

        let result = poll_until(&config, || async { Ok(false) }).await.unwrap();

        assert!(!result);
    }

    #[tokio::test]
    async fn test_poll_until_checks_once_with_zero_timeout() {
        let config = WaitConfig::new(Duration::ZERO);
        let result = poll_until(&config, || async { Ok(true) }).await.unwrap();
        assert!(result);
    }

    #[tokio::test]
    async fn test_poll_until_propagates_errors() {
        let config = WaitConfig::default();
        let result = poll_until(&config, || async {
            Err(Error::ElementNotFound("#missing".to_string()))
        })
        .await;

        assert!(matches!(result, Err(Error::ElementNotFound(_))));
    }

    #[test]
    fn test_timeout_error_message() {
        let err = WaitConfig::new(Duration::from_secs(2)).timeout_error("detail page");
        assert_eq!(
            err.to_string(),
            "Timed out after 2000 ms waiting for detail page"
        );
    }
}
