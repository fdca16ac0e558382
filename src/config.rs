//! Configuration Module
//!
//! Handles loading and validating service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheGateway;
use crate::error::GatewayError;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Maximum number of entries the bounded cache can hold
    pub capacity: usize,
    /// Number of distinct keys the membership filter is sized for
    pub filter_size: usize,
    /// Target false-positive rate of the membership filter
    pub error_rate: f64,
    /// HTTP server port
    pub server_port: u16,
    /// Simulated origin latency in milliseconds
    pub origin_latency_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 5)
    /// - `FILTER_SIZE` - Expected distinct keys for the filter (default: 10000)
    /// - `ERROR_RATE` - Filter false-positive rate (default: 0.01)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `ORIGIN_LATENCY_MS` - Simulated origin latency (default: 1000)
    ///
    /// Unparseable values fall back to the default; out-of-range values are
    /// left for [`Config::build_gateway`] to reject.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: env_or("CACHE_CAPACITY", defaults.capacity),
            filter_size: env_or("FILTER_SIZE", defaults.filter_size),
            error_rate: env_or("ERROR_RATE", defaults.error_rate),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            origin_latency_ms: env_or("ORIGIN_LATENCY_MS", defaults.origin_latency_ms),
        }
    }

    // == Build Gateway ==
    /// Builds the gateway described by this configuration.
    ///
    /// Out-of-range sizing is rejected by the gateway constructor itself.
    pub fn build_gateway(&self) -> Result<CacheGateway<String, String>, GatewayError> {
        CacheGateway::new(self.capacity, self.filter_size, self.error_rate)
    }

    pub fn origin_latency(&self) -> Duration {
        Duration::from_millis(self.origin_latency_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 5,
            filter_size: 10_000,
            error_rate: 0.01,
            server_port: 3000,
            origin_latency_ms: 1000,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
