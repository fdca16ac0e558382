//! API Handlers
//!
//! HTTP request handlers for each request cache endpoint.

use std::sync::Arc;
use tokio::sync::Mutex;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::cache::CacheGateway;
use crate::config::Config;
use crate::error::{ApiError, GatewayError, Result};
use crate::models::{
    validate_key, BatchResolveRequest, BatchResolveResponse, HealthResponse, ResolveResponse,
    StatsResponse,
};
use crate::origin::Origin;

/// Application state shared across all handlers.
///
/// The gateway sits behind one async mutex that stays locked for the whole
/// resolve, origin fetch included, so resolves never overlap.
#[derive(Clone)]
pub struct AppState {
    /// Serialized gateway
    pub gateway: Arc<Mutex<CacheGateway<String, String>>>,
    /// Origin consulted on cache misses
    pub origin: Arc<Origin>,
}

impl AppState {
    /// Creates a new AppState with the given gateway and origin.
    pub fn new(gateway: CacheGateway<String, String>, origin: Origin) -> Self {
        Self {
            gateway: Arc::new(Mutex::new(gateway)),
            origin: Arc::new(origin),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Fails if the configured sizing parameters are invalid.
    pub fn from_config(config: &Config) -> std::result::Result<Self, GatewayError> {
        let gateway = config.build_gateway()?;
        Ok(Self::new(gateway, Origin::new(config.origin_latency())))
    }
}

async fn resolve_key(
    gateway: &mut CacheGateway<String, String>,
    origin: &Arc<Origin>,
    key: String,
) -> Result<ResolveResponse> {
    let origin = Arc::clone(origin);
    let resolved = gateway
        .resolve_async(key.clone(), move |k| async move { origin.fetch(&k).await })
        .await?;

    Ok(ResolveResponse::new(key, resolved))
}

/// Handler for GET /resolve/:key
///
/// Resolves one key through the gateway.
pub async fn resolve_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ResolveResponse>> {
    if let Some(error_msg) = validate_key(&key) {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let mut gateway = state.gateway.lock().await;
    let response = resolve_key(&mut gateway, &state.origin, key).await?;

    Ok(Json(response))
}

/// Handler for POST /resolve
///
/// Replays a key sequence through the gateway in order, stopping at the
/// first origin failure.
pub async fn batch_resolve_handler(
    State(state): State<AppState>,
    Json(req): Json<BatchResolveRequest>,
) -> Result<Json<BatchResolveResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    // One lock for the whole batch keeps the replay contiguous
    let mut gateway = state.gateway.lock().await;
    let mut results = Vec::with_capacity(req.keys.len());
    for key in req.keys {
        results.push(resolve_key(&mut gateway, &state.origin, key).await?);
    }

    let response = BatchResolveResponse::new(results);
    info!(
        keys = response.results.len(),
        fetches = response.fetches,
        "Batch resolved"
    );
    Ok(Json(response))
}

/// Handler for GET /stats
///
/// Returns current gateway statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let gateway = state.gateway.lock().await;
    let stats = gateway.stats();
    let filter = gateway.filter();

    Json(StatsResponse {
        hit_rate: stats.hit_rate(),
        stats,
        filter_bits: filter.num_bits(),
        filter_bits_set: filter.bits_set(),
        estimated_false_positive_rate: filter.estimated_false_positive_rate(),
    })
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
