//! Engine configuration.
//!
//! Passed explicitly at construction; the engine holds no process-wide
//! mutable state and reads no environment of its own.

use std::time::Duration;

/// Configuration for a [`crate::engine::GraphEngine`] instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Prefix for generated resource IDs (e.g. "res" yields "res-a3f8")
    pub id_prefix: String,

    /// Bounded wait for the mutation lock. A mutation that cannot acquire
    /// the lock within this window fails with the retryable `Busy` error
    /// instead of waiting indefinitely.
    pub lock_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            id_prefix: "res".to_string(),
            lock_timeout: Duration::from_secs(5),
        }
    }
}
