//! Origin Module
//!
//! Simulated slow backend standing behind the gateway. Every call sleeps for
//! the configured latency before answering `data:<key>`.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tracing::info;

use crate::error::OriginError;

/// Expensive fetch collaborator used by the HTTP service.
#[derive(Debug)]
pub struct Origin {
    latency: Duration,
    available: AtomicBool,
    calls: AtomicU64,
}

impl Origin {
    /// Creates an available origin answering after `latency`.
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            available: AtomicBool::new(true),
            calls: AtomicU64::new(0),
        }
    }

    // == Fetch ==
    /// Produces the value for `key`, failing when the origin is offline.
    pub async fn fetch(&self, key: &str) -> Result<String, OriginError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        info!(key, latency_ms = self.latency.as_millis() as u64, "Fetching from origin");

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if !self.available.load(Ordering::Relaxed) {
            return Err(OriginError::Unavailable(key.to_string()));
        }

        Ok(format!("data:{}", key))
    }

    /// Switches the origin on or off.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Relaxed);
    }

    /// Number of fetch calls made so far, failed ones included.
    pub fn fetch_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}
