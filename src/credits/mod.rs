//! Cooperative enforcement of the shop's call limit.
//!
//! Shopify's REST Admin API gives each shop a small bucket of call credits
//! (40 by default) and reports the bucket's state on every response in the
//! `X-Shopify-Shop-Api-Call-Limit` header. This module keeps a local copy of
//! that state so that all callers in a process stay under the limit together.
//!
//! # Overview
//!
//! - [`UsageReport`]: the `(used, total)` pair parsed from one response
//! - [`CreditPool`]: the shared, mutex-protected credit counter
//! - [`AdmissionController`]: the wait loop that gates a caller until it holds a credit
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use shopify_gateway::{AdmissionController, CreditPool, UsageReport};
//!
//! # tokio_test::block_on(async {
//! let pool = Arc::new(CreditPool::new(40, 5));
//! let admission = AdmissionController::new(Arc::clone(&pool), Duration::from_secs(10));
//!
//! admission.wait_for_credit().await;
//! // ... send the request ...
//! pool.refresh_from(UsageReport::parse(Some("1/40")));
//! assert_eq!(pool.credits_remaining(), 39);
//! # });
//! ```

mod admission;
mod call_limit;
mod pool;

pub use admission::AdmissionController;
pub use call_limit::{UsageReport, CALL_LIMIT_HEADER};
pub use pool::CreditPool;
