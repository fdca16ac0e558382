//! Error types for the request cache
//!
//! Construction errors for the gateway, origin failures, and the HTTP error
//! type that renders both as JSON.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Gateway Error Enum ==
/// Rejected sizing parameters for the filter, the cache or the gateway.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// Cache capacity must be at least 1
    #[error("Invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    /// Filter must expect at least 1 element
    #[error("Invalid filter size: {0} (must be at least 1)")]
    InvalidFilterSize(usize),

    /// False-positive rate must lie strictly between 0 and 1
    #[error("Invalid error rate: {0} (must be in the open interval (0, 1))")]
    InvalidErrorRate(f64),

    /// Bit array for the requested size cannot be allocated
    #[error("Filter too large: cannot allocate a bit array for {0} elements")]
    FilterTooLarge(usize),
}

// == Origin Error Enum ==
/// Failure reported by the simulated origin.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OriginError {
    /// Origin is offline and cannot serve the key
    #[error("Origin unavailable for key: {0}")]
    Unavailable(String),
}

// == API Error Enum ==
/// Unified error type for the HTTP layer.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The origin fetch failed; nothing was cached
    #[error("Upstream error: {0}")]
    Upstream(#[from] OriginError),

    /// Gateway could not be built
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Gateway(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the HTTP layer.
pub type Result<T> = std::result::Result<T, ApiError>;
