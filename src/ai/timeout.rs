//! Request Timeout Policy
//!
//! Every model call is a single attempt bounded by one timeout. The timeout is
//! injected through [`TimeoutConfig`] so tests can simulate slow calls.
//!
//! ## Usage
//!
//! ```ignore
//! use crate::ai::timeout::{TimeoutConfig, with_timeout};
//!
//! let config = TimeoutConfig::default();
//! let reply = with_timeout(
//!     config.llm_request,
//!     async { /* model call */ },
//!     "chat"
//! ).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use crate::constants::network as net_constants;
use crate::types::{NutriError, Result};

/// Timeout applied to each model call
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Whole round-trip to the hosted model (default: 60 seconds)
    pub llm_request: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            llm_request: Duration::from_secs(net_constants::DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl TimeoutConfig {
    /// Timeout config for a request budget in seconds
    pub fn from_secs(secs: u64) -> Self {
        Self::with_request(Duration::from_secs(secs))
    }

    /// Exact request timeout, mostly for tests
    pub fn with_request(duration: Duration) -> Self {
        Self {
            llm_request: duration,
        }
    }
}

/// Execute an async operation with a timeout
///
/// Returns a timeout error if the operation doesn't complete within the
/// specified duration. The operation is dropped, not retried.
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(NutriError::timeout(operation_name, timeout)),
    }
}
