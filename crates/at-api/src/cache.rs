//! In-process cache for the rendered inventory chart.
//!
//! The whole get-check-render-store sequence runs under one async mutex, so
//! concurrent requests never regenerate the chart twice. Entries expire by
//! time only; data changes within the TTL serve stale bytes.

use crate::error::ApiError;
use chrono::{DateTime, Duration, Utc};
use std::future::Future;
use tokio::sync::Mutex;

struct CachedChart {
    png: Vec<u8>,
    expires_at: DateTime<Utc>,
}

pub struct ChartCache {
    inner: Mutex<Option<CachedChart>>,
}

impl ChartCache {
    pub fn new() -> Self {
        Self { inner: Mutex::new(None) }
    }

    /// Return the cached bytes, rendering only on a miss or after expiry.
    pub async fn get_or_render<F, Fut>(&self, ttl: Duration, render: F) -> Result<Vec<u8>, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<u8>, ApiError>>,
    {
        let mut guard = self.inner.lock().await;

        if let Some(cached) = guard.as_ref() {
            if cached.expires_at > Utc::now() {
                return Ok(cached.png.clone());
            }
        }

        let png = render().await?;
        *guard = Some(CachedChart {
            png: png.clone(),
            expires_at: Utc::now() + ttl,
        });
        Ok(png)
    }

    #[cfg(test)]
    async fn expire_now(&self) {
        if let Some(cached) = self.inner.lock().await.as_mut() {
            cached.expires_at = Utc::now() - Duration::seconds(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn render_counted(counter: &AtomicUsize) -> Result<Vec<u8>, ApiError> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(vec![1, 2, 3])
    }

    #[tokio::test]
    async fn test_second_hit_within_ttl_skips_rendering() {
        let cache = ChartCache::new();
        let calls = AtomicUsize::new(0);

        let first = cache
            .get_or_render(Duration::minutes(30), || render_counted(&calls))
            .await
            .unwrap();
        let second = cache
            .get_or_render(Duration::minutes(30), || render_counted(&calls))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expiry_triggers_rerender() {
        let cache = ChartCache::new();
        let calls = AtomicUsize::new(0);

        cache
            .get_or_render(Duration::minutes(30), || render_counted(&calls))
            .await
            .unwrap();
        cache.expire_now().await;
        cache
            .get_or_render(Duration::minutes(30), || render_counted(&calls))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_render_failure_is_not_cached() {
        let cache = ChartCache::new();
        let calls = AtomicUsize::new(0);

        let failed: Result<Vec<u8>, ApiError> = cache
            .get_or_render(Duration::minutes(30), || async {
                Err(ApiError::Validation("boom".to_string()))
            })
            .await;
        assert!(failed.is_err());

        let ok = cache
            .get_or_render(Duration::minutes(30), || render_counted(&calls))
            .await
            .unwrap();
        assert_eq!(ok, vec![1, 2, 3]);
    }
}
