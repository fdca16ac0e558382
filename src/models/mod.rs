//! Request and Response models for the request cache API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{validate_key, BatchResolveRequest};
pub use responses::{
    BatchResolveResponse, ErrorResponse, HealthResponse, ResolveResponse, StatsResponse,
};
