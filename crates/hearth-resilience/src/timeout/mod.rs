//! Timeout wrapper for async operations.

use hearth_core::HearthError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Runs `fut` to completion or fails with [`HearthError::Timeout`].
///
/// Dropping the returned future abandons `fut` as well, so a caller that
/// goes away cancels the in-flight call.
pub async fn with_timeout<Fut, T>(
    operation: &'static str,
    duration: Duration,
    fut: Fut,
) -> Result<T, HearthError>
where
    Fut: Future<Output = Result<T, HearthError>>,
{
    match tokio::time::timeout(duration, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(operation, timeout_ms = duration.as_millis() as u64, "Operation timed out");
            Err(HearthError::Timeout(format!(
                "{} timed out after {:?}",
                operation, duration
            )))
        }
    }
}

/// Timeouts for the two kinds of backing store the read path touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutPolicy {
    /// Bound on a single repository query.
    pub repository: Duration,
    /// Bound on a single cache command.
    pub cache: Duration,
}

impl TimeoutPolicy {
    #[must_use]
    pub const fn new(repository: Duration, cache: Duration) -> Self {
        Self { repository, cache }
    }

    /// Bounds a repository call.
    pub async fn repository<Fut, T>(&self, operation: &'static str, fut: Fut) -> Result<T, HearthError>
    where
        Fut: Future<Output = Result<T, HearthError>>,
    {
        with_timeout(operation, self.repository, fut).await
    }

    /// Bounds a cache call.
    pub async fn cache<Fut, T>(&self, operation: &'static str, fut: Fut) -> Result<T, HearthError>
    where
        Fut: Future<Output = Result<T, HearthError>>,
    {
        with_timeout(operation, self.cache, fut).await
    }
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self {
            repository: Duration::from_secs(5),
            cache: Duration::from_secs(1),
        }
    }
}
