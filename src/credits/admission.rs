//! Gating of callers until a credit is available.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{GatewayConfig, DEFAULT_RETRY_INTERVAL};
use crate::credits::CreditPool;

/// Polls a [`CreditPool`] until a credit can be taken.
///
/// Each failed attempt suspends the calling task for a fixed interval before
/// trying again. There is no timeout and no retry limit: if Shopify never
/// reports usable credits again, [`wait_for_credit`](Self::wait_for_credit)
/// never completes. Callers that need a deadline can wrap the future in
/// [`tokio::time::timeout`]; dropping it abandons the wait without touching
/// the pool.
///
/// Waiters are not queued. Whichever task polls the pool first after a refresh
/// gets the next credit.
#[derive(Clone, Debug)]
pub struct AdmissionController {
    pool: Arc<CreditPool>,
    retry_interval: Duration,
}

impl AdmissionController {
    /// Creates a controller polling `pool` every `retry_interval`.
    #[must_use]
    pub const fn new(pool: Arc<CreditPool>, retry_interval: Duration) -> Self {
        Self {
            pool,
            retry_interval,
        }
    }

    /// Creates a controller using the retry interval of `config`.
    #[must_use]
    pub const fn from_config(pool: Arc<CreditPool>, config: &GatewayConfig) -> Self {
        Self::new(pool, config.retry_interval())
    }

    /// Returns the pool this controller draws from.
    #[must_use]
    pub const fn pool(&self) -> &Arc<CreditPool> {
        &self.pool
    }

    /// Returns the pause between attempts.
    #[must_use]
    pub const fn retry_interval(&self) -> Duration {
        self.retry_interval
    }

    /// Waits until one credit has been taken from the pool.
    pub async fn wait_for_credit(&self) {
        while !self.pool.try_acquire() {
            tracing::info!(
                retry_in_secs = self.retry_interval.as_secs_f64(),
                "Waiting for a credit"
            );
            tokio::time::sleep(self.retry_interval).await;
        }
    }
}

impl Default for AdmissionController {
    fn default() -> Self {
        Self::new(Arc::new(CreditPool::default()), DEFAULT_RETRY_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready, task};

    #[tokio::test(start_paused = true)]
    async fn test_returns_immediately_when_credit_available() {
        let pool = Arc::new(CreditPool::new(40, 5));
        let controller = AdmissionController::new(Arc::clone(&pool), Duration::from_secs(10));

        let started = tokio::time::Instant::now();
        controller.wait_for_credit().await;

        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(pool.credits_remaining(), 39);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blocks_until_refresh_then_takes_credit() {
        let pool = Arc::new(CreditPool::new(40, 5));
        pool.refresh(37, 40);
        let controller = AdmissionController::new(Arc::clone(&pool), Duration::from_secs(10));

        let mut wait = task::spawn(controller.wait_for_credit());
        assert_pending!(wait.poll());

        // Several retry intervals pass without a refresh.
        for _ in 0..3 {
            tokio::time::advance(Duration::from_secs(10)).await;
            assert_pending!(wait.poll());
        }
        assert_eq!(pool.credits_remaining(), 3);

        pool.refresh(0, 40);
        tokio::time::advance(Duration::from_secs(10)).await;
        assert_ready!(wait.poll());
        assert_eq!(pool.credits_remaining(), 39);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_is_picked_up_on_next_poll_only() {
        let pool = Arc::new(CreditPool::new(40, 5));
        pool.refresh(40, 40);
        let controller = AdmissionController::new(Arc::clone(&pool), Duration::from_secs(10));

        let mut wait = task::spawn(controller.wait_for_credit());
        assert_pending!(wait.poll());

        pool.refresh(0, 40);
        tokio::time::advance(Duration::from_secs(9)).await;
        assert_pending!(wait.poll());
        assert_eq!(pool.credits_remaining(), 40);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_ready!(wait.poll());
        assert_eq!(pool.credits_remaining(), 39);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_abandons_wait_without_consuming() {
        let pool = Arc::new(CreditPool::new(40, 5));
        pool.refresh(40, 40);
        let controller = AdmissionController::new(Arc::clone(&pool), Duration::from_secs(10));

        let result =
            tokio::time::timeout(Duration::from_secs(35), controller.wait_for_credit()).await;

        assert!(result.is_err());
        assert_eq!(pool.credits_remaining(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_waiters_each_take_one_credit() {
        let pool = Arc::new(CreditPool::new(40, 5));
        pool.refresh(35, 40);
        let controller = AdmissionController::new(Arc::clone(&pool), Duration::from_secs(10));

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let controller = controller.clone();
                tokio::spawn(async move { controller.wait_for_credit().await })
            })
            .collect();

        tokio::time::sleep(Duration::from_secs(1)).await;
        pool.refresh(32, 40);

        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(pool.credits_remaining(), 5);
    }

    #[test]
    fn test_default_controller_uses_default_policy() {
        let controller = AdmissionController::default();
        assert_eq!(controller.retry_interval(), Duration::from_secs(10));
        assert_eq!(controller.pool().credits_remaining(), 40);
    }
}
