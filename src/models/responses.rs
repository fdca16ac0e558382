//! Response DTOs for the request cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{GatewayStats, ResolveOutcome, Resolved};

/// Response body for a single resolve (GET /resolve/:key)
#[derive(Debug, Clone, Serialize)]
pub struct ResolveResponse {
    /// The requested key
    pub key: String,
    /// The resolved value
    pub value: String,
    /// Which admission branch served the request
    pub outcome: ResolveOutcome,
}

impl ResolveResponse {
    /// Creates a new ResolveResponse from a gateway result
    pub fn new(key: impl Into<String>, resolved: Resolved<String>) -> Self {
        Self {
            key: key.into(),
            value: resolved.value,
            outcome: resolved.outcome,
        }
    }
}

/// Response body for the batch resolve operation (POST /resolve)
#[derive(Debug, Clone, Serialize)]
pub struct BatchResolveResponse {
    /// Per-key results, in request order
    pub results: Vec<ResolveResponse>,
    /// Origin calls made while serving this batch
    pub fetches: usize,
}

impl BatchResolveResponse {
    /// Creates a new BatchResolveResponse, counting non-cached results as fetches
    pub fn new(results: Vec<ResolveResponse>) -> Self {
        let fetches = results
            .iter()
            .filter(|r| r.outcome != ResolveOutcome::CacheHit)
            .count();
        Self { results, fetches }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Raw gateway counters
    #[serde(flatten)]
    pub stats: GatewayStats,
    /// Hit rate (cache_hits / lookups)
    pub hit_rate: f64,
    /// Bits in the membership filter
    pub filter_bits: usize,
    /// Bits currently set in the membership filter
    pub filter_bits_set: usize,
    /// Current false-positive estimate of the membership filter
    pub estimated_false_positive_rate: f64,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
