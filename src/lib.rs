//! Request Cache - A two-stage cache for expensive fetches
//!
//! A Bloom filter admits only repeated keys into a bounded LRU store, so
//! one-off requests never evict useful entries.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod origin;

pub use api::AppState;
pub use cache::{BoundedCache, CacheGateway, GatewayStats, MembershipFilter, ResolveOutcome};
pub use config::Config;
pub use error::{ApiError, GatewayError, OriginError};
pub use origin::Origin;
