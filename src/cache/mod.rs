//! Cache Module
//!
//! Two-stage request caching: a Bloom filter decides admission into a
//! bounded LRU store.

mod filter;
mod gateway;
mod lru;
mod stats;


// Re-export public types
pub use filter::MembershipFilter;
pub use gateway::{CacheGateway, ResolveOutcome, Resolved};
pub use lru::BoundedCache;
pub use stats::GatewayStats;

// == Public Constants ==
/// Maximum allowed key length in bytes for keys arriving over HTTP
pub const MAX_KEY_LENGTH: usize = 256;
