//! Hash-based task id generation.
//!
//! Task ids are opaque strings of the form `{prefix}-{hash}` (e.g.
//! "task-a3f8"), where the hash is a base36-encoded SHA256 digest of the
//! task content plus a timestamp. Collisions are resolved with a nonce
//! retry, falling back to a longer hash. Length adapts to database size
//! (4 chars up to 500 tasks, 5 up to 1500, 6 beyond).

use chrono::Utc;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, warn};

const BASE36_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const MAX_NONCE: u32 = 100;
const MAX_HASH_LENGTH: usize = 6;

/// Errors that can occur during id generation
#[derive(Debug, Error)]
pub enum IdGenerationError {
    /// Unable to generate a unique id after exhausting all nonces and the
    /// length increase
    #[error("Unable to generate unique id after {attempts} attempts")]
    CollisionExhausted {
        /// Number of nonce attempts made
        attempts: u32,
    },
}

/// Configuration for id generation
#[derive(Debug, Clone)]
pub struct IdGeneratorConfig {
    /// Prefix for all ids (e.g., "task")
    pub prefix: String,

    /// Current size of the database (affects adaptive length)
    pub database_size: usize,
}

/// Hash-based id generator with collision detection.
///
/// Tracks every id it has generated or been told about, so freshly
/// generated ids never collide with existing tasks.
pub struct IdGenerator {
    config: IdGeneratorConfig,
    existing_ids: HashSet<String>,
}

impl IdGenerator {
    /// Create a new id generator with the given configuration
    pub fn new(config: IdGeneratorConfig) -> Self {
        Self {
            config,
            existing_ids: HashSet::new(),
        }
    }

    /// Register an existing id to prevent collisions
    pub fn register_id(&mut self, id: String) {
        self.existing_ids.insert(id);
    }

    /// Number of registered ids
    #[must_use]
    pub fn database_size(&self) -> usize {
        self.config.database_size
    }

    /// Generate a new unique id from the task content.
    ///
    /// # Errors
    ///
    /// Returns an error if no unique id could be produced after trying all
    /// nonces at the adaptive length and one longer fallback.
    pub fn generate(&mut self, title: &str, description: &str) -> Result<String, IdGenerationError> {
        let id_length = self.adaptive_length();

        for nonce in 0..MAX_NONCE {
            let id = self.hash_id(title, description, nonce, id_length);
            if !self.existing_ids.contains(&id) {
                if nonce > 0 {
                    debug!(nonce, id_length, "generated unique id after collision retries");
                }
                self.existing_ids.insert(id.clone());
                return Ok(id);
            }
        }

        // All nonces collided at this length; try one size up.
        if id_length < MAX_HASH_LENGTH {
            warn!(
                id_length,
                max_nonce = MAX_NONCE,
                "all nonces exhausted, increasing id length"
            );
            let longer = self.hash_id(title, description, 0, id_length + 1);
            if !self.existing_ids.contains(&longer) {
                self.existing_ids.insert(longer.clone());
                return Ok(longer);
            }
        }

        Err(IdGenerationError::CollisionExhausted {
            attempts: MAX_NONCE,
        })
    }

    fn hash_id(&self, title: &str, description: &str, nonce: u32, length: usize) -> String {
        let timestamp = Utc::now().timestamp_micros();
        let content = format!("{}|{}|{}|{}", title, description, timestamp, nonce);

        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        let hash_bytes = hasher.finalize();

        let hash_str = encode_base36(&hash_bytes[..8], length);
        format!("{}-{}", self.config.prefix, hash_str)
    }

    /// Id length grows with database size to keep collision retries rare.
    fn adaptive_length(&self) -> usize {
        match self.config.database_size {
            0..=500 => 4,
            501..=1500 => 5,
            _ => 6,
        }
    }
}

/// Encode the first bytes of a hash as a fixed-length base36 string.
///
/// Wrapping arithmetic is intentional: the input is capped at 8 bytes and
/// the encoding only needs to be deterministic, not reversible.
fn encode_base36(bytes: &[u8], length: usize) -> String {
    let mut num: u64 = 0;
    for &byte in bytes {
        num = num.wrapping_shl(8).wrapping_add(u64::from(byte));
    }

    let mut result = Vec::with_capacity(length);
    let mut n = num;
    while result.len() < length {
        let remainder = (n % 36) as usize;
        result.push(BASE36_CHARS[remainder]);
        n /= 36;
    }
    result.reverse();

    // BASE36_CHARS is pure ASCII
    String::from_utf8_lossy(&result).into_owned()
}

/// Validate id format: `{prefix}-{hash}` with a 4-6 char alphanumeric hash.
pub fn validate_id(id: &str, prefix: &str) -> bool {
    let Some(hash) = id.strip_prefix(&format!("{}-", prefix)) else {
        return false;
    };

    (4..=MAX_HASH_LENGTH).contains(&hash.len())
        && hash.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(database_size: usize) -> IdGenerator {
        IdGenerator::new(IdGeneratorConfig {
            prefix: "task".to_string(),
            database_size,
        })
    }

    #[test]
    fn base36_encoding_has_requested_length() {
        let result = encode_base36(&[0x12, 0x34, 0x56, 0x78], 4);
        assert_eq!(result.len(), 4);
        assert!(result.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn adaptive_length_follows_database_size() {
        assert_eq!(generator(100).adaptive_length(), 4);
        assert_eq!(generator(800).adaptive_length(), 5);
        assert_eq!(generator(2000).adaptive_length(), 6);
    }

    #[test]
    fn generated_ids_carry_prefix_and_validate() {
        let mut id_gen = generator(100);
        let id = id_gen.generate("Test title", "Test description").unwrap();
        assert!(id.starts_with("task-"));
        assert!(validate_id(&id, "task"));
    }

    #[test]
    fn identical_content_yields_distinct_ids() {
        let mut id_gen = generator(100);
        let id1 = id_gen.generate("Same", "Same").unwrap();
        let id2 = id_gen.generate("Same", "Same").unwrap();
        assert_ne!(id1, id2);
    }

    #[test]
    fn registered_ids_are_never_reissued() {
        let mut id_gen = generator(100);
        id_gen.register_id("task-a3f8".to_string());
        id_gen.register_id("task-b4g9".to_string());

        let id = id_gen.generate("New", "Task").unwrap();
        assert_ne!(id, "task-a3f8");
        assert_ne!(id, "task-b4g9");
    }

    #[test]
    fn id_validation_rejects_bad_shapes() {
        assert!(validate_id("task-a3f8", "task"));
        assert!(validate_id("task-abc123", "task"));

        assert!(!validate_id("invalid", "task"));
        assert!(!validate_id("task-", "task"));
        assert!(!validate_id("task-ab", "task")); // too short
        assert!(!validate_id("task-abcdefg", "task")); // too long
        assert!(!validate_id("wrong-a3f8", "task")); // wrong prefix
    }
}
