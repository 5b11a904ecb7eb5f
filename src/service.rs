//! Read, append and remove operations over the stored URL list.

use crate::models::{Entry, UrlList};
use crate::record::RecordStore;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("missing required field: {0}")]
    InvalidArgument(&'static str),
    #[error("the list is empty")]
    EmptyList,
    #[error("no entry with url '{0}'")]
    NotFound(String),
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),
}

/// Every call is a fresh load-mutate-save against the record store.
#[derive(Clone)]
pub struct ListService {
    records: RecordStore,
}

impl ListService {
    pub fn new(records: RecordStore) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    /// All entries in insertion order
    pub async fn list_entries(&self) -> Result<UrlList, ListError> {
        Ok(self.records.load().await?)
    }

    /// Append a new entry stamped with the current time
    ///
    /// Duplicate urls are accepted; each append adds its own entry.
    pub async fn append_entry(&self, url: &str, name: &str) -> Result<Entry, ListError> {
        if url.is_empty() {
            return Err(ListError::InvalidArgument("url"));
        }
        if name.is_empty() {
            return Err(ListError::InvalidArgument("name"));
        }

        let mut list = self.records.load().await?;
        let entry = Entry::new(url, name);
        list.urls.push(entry.clone());
        self.records.save(&list).await?;

        tracing::info!("Added entry '{}' -> {} ({} total)", entry.name, entry.url, list.urls.len());
        Ok(entry)
    }

    /// Remove every entry whose url matches exactly, returning how many were dropped
    pub async fn remove_entry(&self, url: &str) -> Result<usize, ListError> {
        if url.is_empty() {
            return Err(ListError::InvalidArgument("url"));
        }

        let mut list = self.records.load().await?;
        if list.urls.is_empty() {
            return Err(ListError::EmptyList);
        }

        let before = list.urls.len();
        list.urls.retain(|entry| entry.url != url);
        let removed = before - list.urls.len();
        if removed == 0 {
            return Err(ListError::NotFound(url.to_string()));
        }

        self.records.save(&list).await?;

        tracing::info!("Removed {} entries matching {}", removed, url);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RECORD_KEY;
    use crate::record::test_support::FlakyStore;
    use crate::store::{KvStore, MemoryStore};
    use chrono::DateTime;
    use std::sync::Arc;
    use std::time::Duration;

    fn service_with(store: Arc<dyn KvStore>) -> ListService {
        ListService::new(RecordStore::new(store, Duration::from_secs(1), 0))
    }

    fn service() -> (ListService, MemoryStore) {
        let store = MemoryStore::new();
        (service_with(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn test_list_without_record_is_empty() {
        let (service, _) = service();
        assert!(service.list_entries().await.unwrap().urls.is_empty());
    }

    #[tokio::test]
    async fn test_append_then_list() {
        let (service, _) = service();

        let created = service.append_entry("http://a", "A").await.unwrap();
        let list = service.list_entries().await.unwrap();

        assert_eq!(list.urls, vec![created]);
        let entry = &list.urls[0];
        assert_eq!(entry.url, "http://a");
        assert_eq!(entry.name, "A");

        let json = serde_json::to_value(entry).unwrap();
        let added_at = json["addedAt"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(added_at).is_ok());
    }

    #[tokio::test]
    async fn test_append_keeps_insertion_order() {
        let (service, _) = service();
        for (url, name) in [("http://c", "C"), ("http://a", "A"), ("http://b", "B")] {
            service.append_entry(url, name).await.unwrap();
        }

        let urls: Vec<_> = service
            .list_entries()
            .await
            .unwrap()
            .urls
            .into_iter()
            .map(|e| e.url)
            .collect();
        assert_eq!(urls, ["http://c", "http://a", "http://b"]);
    }

    #[tokio::test]
    async fn test_duplicate_urls_are_allowed() {
        let (service, _) = service();
        service.append_entry("http://a", "A").await.unwrap();
        service.append_entry("http://a", "A again").await.unwrap();

        assert_eq!(service.list_entries().await.unwrap().urls.len(), 2);
    }

    #[tokio::test]
    async fn test_append_rejects_empty_fields_without_writing() {
        let (service, store) = service();

        let err = service.append_entry("", "A").await.unwrap_err();
        assert!(matches!(err, ListError::InvalidArgument("url")));

        let err = service.append_entry("http://a", "").await.unwrap_err();
        assert!(matches!(err, ListError::InvalidArgument("name")));

        assert!(store.get(RECORD_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_drops_all_matches_and_keeps_others() {
        let (service, _) = service();
        service.append_entry("http://a", "A").await.unwrap();
        service.append_entry("http://b", "B").await.unwrap();
        service.append_entry("http://a", "A2").await.unwrap();

        assert_eq!(service.remove_entry("http://a").await.unwrap(), 2);

        let list = service.list_entries().await.unwrap();
        assert_eq!(list.urls.len(), 1);
        assert_eq!(list.urls[0].url, "http://b");
        assert_eq!(list.urls[0].name, "B");
    }

    #[tokio::test]
    async fn test_remove_twice_is_not_found() {
        let (service, _) = service();
        service.append_entry("http://a", "A").await.unwrap();
        service.remove_entry("http://a").await.unwrap();

        let err = service.remove_entry("http://a").await.unwrap_err();
        assert!(matches!(err, ListError::EmptyList));
    }

    #[tokio::test]
    async fn test_remove_without_match_leaves_record_untouched() {
        let (service, store) = service();
        service.append_entry("http://a", "A").await.unwrap();
        let before = store.get(RECORD_KEY).await.unwrap();

        let err = service.remove_entry("http://z").await.unwrap_err();
        assert!(matches!(err, ListError::NotFound(ref url) if url == "http://z"));
        assert_eq!(store.get(RECORD_KEY).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_remove_matches_exactly() {
        let (service, _) = service();
        service.append_entry("http://a/", "A").await.unwrap();

        assert!(matches!(
            service.remove_entry("http://A/").await.unwrap_err(),
            ListError::NotFound(_)
        ));
        assert!(matches!(
            service.remove_entry("http://a").await.unwrap_err(),
            ListError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_remove_rejects_empty_url() {
        let (service, _) = service();
        assert!(matches!(
            service.remove_entry("").await.unwrap_err(),
            ListError::InvalidArgument("url")
        ));
    }

    #[tokio::test]
    async fn test_added_at_survives_later_writes() {
        let (service, _) = service();
        let first = service.append_entry("http://a", "A").await.unwrap();
        service.append_entry("http://b", "B").await.unwrap();
        service.remove_entry("http://b").await.unwrap();

        let list = service.list_entries().await.unwrap();
        assert_eq!(list.urls[0].added_at, first.added_at);
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_unavailable() {
        let service = service_with(Arc::new(FlakyStore::failing(u32::MAX)));

        assert!(matches!(
            service.list_entries().await.unwrap_err(),
            ListError::StoreUnavailable(_)
        ));
        assert!(matches!(
            service.append_entry("http://a", "A").await.unwrap_err(),
            ListError::StoreUnavailable(_)
        ));
    }
}
