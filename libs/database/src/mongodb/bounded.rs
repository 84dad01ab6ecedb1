use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Default bound on a single store round-trip
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_millis(5000);

/// A store round-trip did not finish within its bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("store operation did not complete within {0:?}")]
pub struct StoreTimeout(pub Duration);

/// Await `operation` for at most `limit`.
///
/// On expiry the operation future is dropped, which hands its pooled
/// connection back to the driver.
pub async fn bounded<F, T>(limit: Duration, operation: F) -> Result<T, StoreTimeout>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(limit, operation).await.map_err(|_| {
        warn!(timeout_ms = limit.as_millis() as u64, "Store operation timed out");
        StoreTimeout(limit)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_passes_through_fast_results() {
        let result = bounded(Duration::from_millis(100), async { Ok::<_, String>(3) }).await;
        assert_eq!(result, Ok(Ok(3)));
    }

    #[tokio::test]
    async fn test_bounded_times_out_slow_operations() {
        let limit = Duration::from_millis(20);
        let result = bounded(limit, async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            1
        })
        .await;
        assert_eq!(result, Err(StoreTimeout(limit)));
    }
}
