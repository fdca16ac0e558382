//! API Module
//!
//! HTTP handlers and routing for the request cache service.
//!
//! # Endpoints
//! - `GET /resolve/:key` - Resolve one key through the gateway
//! - `POST /resolve` - Resolve a sequence of keys in order
//! - `GET /stats` - Get gateway statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
