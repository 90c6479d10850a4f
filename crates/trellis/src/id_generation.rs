//! Hash-based resource ID generation.
//!
//! IDs have the form `{prefix}-{hash}` (e.g. `res-a3f8`), where the hash is
//! a base36 slice of SHA-256 over the resource's name, description, and a
//! creation timestamp. Hash length adapts to how many IDs are already taken,
//! and collisions against known IDs are resolved with a bounded nonce retry.

use chrono::Utc;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use thiserror::Error;

const BASE36_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const MAX_NONCE: u32 = 100;

/// Errors that can occur during ID generation
#[derive(Debug, Error)]
pub enum IdGenerationError {
    /// Unable to generate a unique ID after exhausting all nonces
    #[error("unable to generate a unique ID after {attempts} attempts")]
    CollisionExhausted { attempts: u32 },
}

/// Collision-aware ID generator.
///
/// Seed it with the IDs already present in the store (via
/// [`IdGenerator::with_existing`]); every generated ID is also registered so
/// repeated calls on one generator never collide with each other.
pub struct IdGenerator {
    prefix: String,
    existing: HashSet<String>,
}

impl IdGenerator {
    /// Create a generator with no known IDs.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            existing: HashSet::new(),
        }
    }

    /// Create a generator seeded with the IDs already in use.
    pub fn with_existing<I>(prefix: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            prefix: prefix.into(),
            existing: ids.into_iter().collect(),
        }
    }

    /// Register an existing ID to prevent collisions
    pub fn register(&mut self, id: String) {
        self.existing.insert(id);
    }

    /// Generate a new unique ID from the resource's content.
    pub fn generate(
        &mut self,
        name: &str,
        description: &str,
    ) -> Result<String, IdGenerationError> {
        let length = hash_length(self.existing.len());
        let timestamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();

        for nonce in 0..MAX_NONCE {
            let mut hasher = Sha256::new();
            hasher.update(name.as_bytes());
            hasher.update(b"\0");
            hasher.update(description.as_bytes());
            hasher.update(timestamp.to_le_bytes());
            hasher.update(nonce.to_le_bytes());
            let digest = hasher.finalize();

            // Grow the hash every 25 failed nonces; repeated collisions at a
            // given length mean the namespace is too crowded for it.
            let id = format!(
                "{}-{}",
                self.prefix,
                base36_encode(&digest, length + (nonce / 25) as usize)
            );

            if self.existing.insert(id.clone()) {
                return Ok(id);
            }
        }

        Err(IdGenerationError::CollisionExhausted {
            attempts: MAX_NONCE,
        })
    }
}

/// Adaptive hash length: 4 chars up to 500 IDs, 5 up to 1500, 6 beyond.
fn hash_length(taken: usize) -> usize {
    match taken {
        0..=500 => 4,
        501..=1500 => 5,
        _ => 6,
    }
}

/// Encode the leading digest bytes as `length` base36 characters.
fn base36_encode(digest: &[u8], length: usize) -> String {
    let mut value = digest
        .iter()
        .take(16)
        .fold(0u128, |acc, &b| (acc << 8) | u128::from(b));

    let mut out = Vec::with_capacity(length);
    for _ in 0..length {
        out.push(BASE36_CHARS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
