//! Request DTOs for the request cache API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cache::MAX_KEY_LENGTH;

/// Request body for the batch resolve operation (POST /resolve)
///
/// # Fields
/// - `keys`: Keys to resolve, in order
#[derive(Debug, Clone, Deserialize)]
pub struct BatchResolveRequest {
    /// Keys replayed through the gateway in order
    pub keys: Vec<String>,
}

impl BatchResolveRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.keys.is_empty() {
            return Some("Keys cannot be empty".to_string());
        }
        self.keys.iter().find_map(|key| validate_key(key))
    }
}

/// Validates a single cache key
///
/// Returns an error message if the key is empty or too long.
pub fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}
