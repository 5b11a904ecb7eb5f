//! Loads and saves the single list record kept in the key-value store.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::models::{Entry, UrlList};
use crate::store::{KvStore, StoreError, StoreResult};

/// Key the list record lives under
pub const RECORD_KEY: &str = "url_list";

const INITIAL_BACKOFF: Duration = Duration::from_millis(100);

/// Repository over the one persisted [`UrlList`]
///
/// `load` followed by `save` is not atomic: concurrent writers race and the
/// last write wins.
#[derive(Clone)]
pub struct RecordStore {
    store: Arc<dyn KvStore>,
    timeout: Duration,
    max_retries: u32,
}

impl RecordStore {
    pub fn new(store: Arc<dyn KvStore>, timeout: Duration, max_retries: u32) -> Self {
        Self {
            store,
            timeout,
            max_retries,
        }
    }

    /// Fetch the record, treating a missing or corrupt value as an empty list
    pub async fn load(&self) -> StoreResult<UrlList> {
        let raw = self.call(|| self.store.get(RECORD_KEY)).await?;

        let Some(raw) = raw else {
            tracing::debug!("No record under '{}', starting empty", RECORD_KEY);
            return Ok(UrlList::default());
        };

        Ok(decode(&raw))
    }

    /// Overwrite the record with `list`
    pub async fn save(&self, list: &UrlList) -> StoreResult<()> {
        let raw = serde_json::to_string(list)
            .map_err(|e| StoreError::Backend(anyhow::Error::new(e).context("Failed to serialize list")))?;

        self.call(|| self.store.put(RECORD_KEY, &raw)).await?;
        tracing::debug!("Saved {} entries under '{}'", list.urls.len(), RECORD_KEY);
        Ok(())
    }

    pub async fn health_check(&self) -> StoreResult<()> {
        self.call(|| self.store.health_check()).await
    }

    /// Run one store call under the timeout, retrying failures with backoff
    async fn call<T, F, Fut>(&self, mut op: F) -> StoreResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = StoreResult<T>>,
    {
        let mut backoff = INITIAL_BACKOFF;
        let mut attempt = 0;

        loop {
            let result = match tokio::time::timeout(self.timeout, op()).await {
                Ok(result) => result,
                Err(_) => Err(StoreError::Timeout(self.timeout.as_millis())),
            };

            match result {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        "Store call failed (attempt {}/{}), retrying in {}ms: {}",
                        attempt,
                        self.max_retries + 1,
                        backoff.as_millis(),
                        e
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
                Err(e) => {
                    tracing::error!("Store call failed: {}", e);
                    return Err(e);
                }
            }
        }
    }
}

/// Record shape as written by any past deployment; entries are checked one by one
#[derive(Deserialize)]
struct LooseRecord {
    #[serde(default)]
    urls: Option<Vec<serde_json::Value>>,
}

/// Decode a stored record, dropping only the entries that don't fit [`Entry`]
fn decode(raw: &str) -> UrlList {
    let record = match serde_json::from_str::<LooseRecord>(raw) {
        Ok(record) => record,
        Err(e) => {
            // The next save replaces this value, so keep it in the log
            tracing::error!(
                "Record under '{}' is not a valid list, treating as empty ({}): {}",
                RECORD_KEY,
                e,
                raw
            );
            return UrlList::default();
        }
    };

    let urls = record
        .urls
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| match Entry::deserialize(&value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::error!("Dropping malformed entry under '{}' ({}): {}", RECORD_KEY, e, value);
                None
            }
        })
        .collect();

    UrlList { urls }
}
