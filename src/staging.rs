//! Staging Area Module
//!
//! This module provides the keyed exclusive-access store backing the shared
//! counter. Any number of concurrent callers may operate on the same key;
//! each read-modify-write runs under that key's lock, so no two callers ever
//! observe the same pre-update value. The critical section takes a
//! synchronous closure, which keeps unbounded-latency I/O out of it by
//! construction.
//!
//! Lock acquisition is bounded by a timeout rather than blocking forever
//! when a key is starved.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

/// Key path of the shared acceptance counter.
pub const COUNTER_KEY: &[&str] = &["counter"];

// ============================================================================
// ERRORS
// ============================================================================

/// Error acquiring or using the staging store.
///
/// Any of these during acceptance means the message must not be accepted:
/// no counter mutation happened, so dropping the message keeps the counter
/// exact.
#[derive(Debug, Error)]
pub enum StagingError {
    /// Exclusive access to the key was not granted within the configured bound.
    #[error("timed out acquiring exclusive access to staging key '{0}'")]
    LockTimeout(String),
    /// The backing store rejected the operation.
    #[error("staging area unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// STAGING AREA IMPLEMENTATION
// ============================================================================

/// Keyed exclusive-access store.
///
/// Values are JSON so listener processes written against the same staging
/// contract agree on the representation. The registry lock is held only long
/// enough to look up or create a key's entry; per-key work happens under the
/// key's own lock.
pub struct StagingArea {
    /// Registry of per-key entries
    keys: Mutex<HashMap<String, Arc<Mutex<Option<Value>>>>>,
    /// Upper bound on waiting for a key's lock
    lock_timeout: Duration,
}

impl StagingArea {
    /// Creates a staging area with the given lock-acquisition bound.
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            keys: Mutex::new(HashMap::new()),
            lock_timeout,
        }
    }

    /// Looks up or creates the entry for a key.
    async fn entry(&self, key: &str) -> Arc<Mutex<Option<Value>>> {
        let mut keys = self.keys.lock().await;
        keys.entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone()
    }

    /// Runs a read-modify-write on a key under exclusive access.
    ///
    /// The closure receives the current value (`None` on first access) and
    /// returns the value to store plus the result to hand back. The write
    /// lands atomically with the release of exclusivity.
    ///
    /// # Arguments
    ///
    /// * `key_path` - Namespaced key, e.g. `["counter"]`
    /// * `f` - Pure in-memory computation; runs while the key's lock is held
    ///
    /// # Returns
    ///
    /// * `Ok(T)` - The closure's result
    /// * `Err(StagingError::LockTimeout)` - Exclusive access not granted in time
    pub async fn with_key<F, T>(&self, key_path: &[&str], f: F) -> Result<T, StagingError>
    where
        F: FnOnce(Option<Value>) -> (Value, T),
    {
        let key = key_path.join("/");
        let entry = self.entry(&key).await;
        let mut guard = tokio::time::timeout(self.lock_timeout, entry.lock())
            .await
            .map_err(|_| StagingError::LockTimeout(key.clone()))?;
        let (new_value, result) = f(guard.take());
        *guard = Some(new_value);
        Ok(result)
    }

    /// Increments the integer stored under a key and returns the new value.
    ///
    /// The stored value defaults to 0 when absent or non-integer. Concurrent
    /// callers on the same key starting from 0 observe exactly {1, 2, ..., N}.
    pub async fn increment_counter(&self, key_path: &[&str]) -> Result<u64, StagingError> {
        self.with_key(key_path, |current| {
            let previous = current.as_ref().and_then(Value::as_u64).unwrap_or(0);
            let counter = previous + 1;
            debug!(previous, counter, "counter updated");
            (Value::from(counter), counter)
        })
        .await
    }

    /// Reads the current value of a key without modifying it.
    pub async fn read_key(&self, key_path: &[&str]) -> Result<Option<Value>, StagingError> {
        let key = key_path.join("/");
        let entry = self.entry(&key).await;
        let guard = tokio::time::timeout(self.lock_timeout, entry.lock())
            .await
            .map_err(|_| StagingError::LockTimeout(key))?;
        Ok(guard.clone())
    }
}
