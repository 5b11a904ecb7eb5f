//! Key-value backends holding the persisted list record.

mod memory;
mod spanner;

pub use memory::MemoryStore;
pub use spanner::SpannerStore;

use async_trait::async_trait;

/// Errors raised by a key-value backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store operation timed out after {0}ms")]
    Timeout(u128),
    #[error("{0:#}")]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Minimal string-valued key-value store
///
/// Values are opaque to the store; callers own the encoding.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch the value stored under `key`, or `None` if it was never written.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Verify the backend is reachable.
    async fn health_check(&self) -> StoreResult<()>;
}
