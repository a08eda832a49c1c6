//! The shared credit counter.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::{GatewayConfig, DEFAULT_MAX_CREDITS, DEFAULT_SAFETY_BUFFER};
use crate::credits::UsageReport;

/// The process-wide pool of call-limit credits for one shop.
///
/// Every outbound request takes one credit through [`try_acquire`](Self::try_acquire),
/// and every response resynchronizes the pool through [`refresh`](Self::refresh).
/// Both operations run entirely under one mutex, so concurrent callers never
/// lose an update or see a half-applied refresh. Neither operation blocks
/// beyond that brief critical section; waiting is the job of
/// [`AdmissionController`](crate::AdmissionController).
///
/// Share a pool by `Arc` between every gateway that talks to the same shop.
///
/// # Example
///
/// ```rust
/// use shopify_gateway::CreditPool;
///
/// let pool = CreditPool::new(40, 5);
/// assert!(pool.try_acquire());
/// assert_eq!(pool.credits_remaining(), 39);
///
/// pool.refresh(38, 40);
/// assert_eq!(pool.credits_remaining(), 2);
/// assert!(!pool.try_acquire());
/// ```
#[derive(Debug)]
pub struct CreditPool {
    max_credits: i64,
    safety_buffer: i64,
    credits_remaining: Mutex<i64>,
}

// Verify CreditPool is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CreditPool>();
};

impl CreditPool {
    /// Creates a full pool of `max_credits`.
    #[must_use]
    pub fn new(max_credits: u32, safety_buffer: u32) -> Self {
        let max_credits = i64::from(max_credits);
        Self {
            max_credits,
            safety_buffer: i64::from(safety_buffer),
            credits_remaining: Mutex::new(max_credits),
        }
    }

    /// Creates a full pool using the credit policy of `config`.
    #[must_use]
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(config.max_credits(), config.safety_buffer())
    }

    /// Takes one credit if more than the safety buffer remains.
    ///
    /// Returns `false` and leaves the pool untouched otherwise.
    pub fn try_acquire(&self) -> bool {
        let mut remaining = self.lock();
        if *remaining > self.safety_buffer {
            *remaining -= 1;
            tracing::debug!(credits_remaining = *remaining, "Obtained credit");
            true
        } else {
            false
        }
    }

    /// Overwrites the remaining credits with `total - used`.
    ///
    /// The result may be negative if Shopify reports more credits in use than
    /// the bucket holds.
    pub fn refresh(&self, used: i64, total: i64) {
        let mut remaining = self.lock();
        *remaining = total.saturating_sub(used);
        tracing::debug!(
            used,
            total,
            credits_remaining = *remaining,
            "Setting credits from response"
        );
    }

    /// Refreshes the pool from a parsed call-limit header.
    pub fn refresh_from(&self, report: UsageReport) {
        self.refresh(report.used, report.total);
    }

    /// Returns a snapshot of the remaining credits.
    ///
    /// The value may be stale as soon as it is returned; admission decisions
    /// must go through [`try_acquire`](Self::try_acquire).
    #[must_use]
    pub fn credits_remaining(&self) -> i64 {
        *self.lock()
    }

    /// Returns the bucket size this pool started with.
    #[must_use]
    pub const fn max_credits(&self) -> i64 {
        self.max_credits
    }

    /// Returns the number of credits held back from admission.
    #[must_use]
    pub const fn safety_buffer(&self) -> i64 {
        self.safety_buffer
    }

    // A panic while holding the lock cannot leave the integer half-written.
    fn lock(&self) -> MutexGuard<'_, i64> {
        self.credits_remaining
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CreditPool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CREDITS, DEFAULT_SAFETY_BUFFER)
    }
}
