use std::sync::Arc;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::AppResult,
    models::Dictionary,
    services::catalog::ArtworkStore,
};

/// Lists the category-tag catalog, read-through cached when Redis is configured
#[derive(Clone)]
pub struct DictionaryService {
    store: Arc<dyn ArtworkStore>,
    cache: Option<Cache>,
    ttl: u64,
}

impl DictionaryService {
    pub fn new(store: Arc<dyn ArtworkStore>, cache: Option<Cache>, ttl: u64) -> Self {
        Self { store, cache, ttl }
    }

    /// All dictionaries, optionally restricted to one group (case-insensitive)
    pub async fn list(&self, group: Option<&str>) -> AppResult<Vec<Dictionary>> {
        let all = self.list_all().await?;

        Ok(match group {
            Some(group) => all
                .into_iter()
                .filter(|d| {
                    d.group
                        .as_deref()
                        .is_some_and(|g| g.eq_ignore_ascii_case(group))
                })
                .collect(),
            None => all,
        })
    }

    async fn list_all(&self) -> AppResult<Vec<Dictionary>> {
        match &self.cache {
            Some(cache) => {
                cached!(cache, CacheKey::Dictionaries, self.ttl, self.store.list_dictionaries())
            }
            None => self.store.list_dictionaries().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_redis_client, redis::test_server::TestRedis};
    use crate::error::AppError;
    use crate::services::catalog::{InMemoryArtworkStore, MockArtworkStore};

    fn dictionary(id: i64, title: &str, group: Option<&str>) -> Dictionary {
        Dictionary {
            id,
            title: title.to_string(),
            group: group.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_lists_all_without_cache() {
        let store = InMemoryArtworkStore::new();
        store
            .set_dictionaries(vec![
                dictionary(1, "Cubism", Some("style")),
                dictionary(2, "portrait", Some("genre")),
            ])
            .await;
        let service = DictionaryService::new(Arc::new(store), None, 60);

        let all = tokio_test::assert_ok!(service.list(None).await);
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_group_filter_is_case_insensitive() {
        let store = InMemoryArtworkStore::new();
        store
            .set_dictionaries(vec![
                dictionary(1, "Cubism", Some("style")),
                dictionary(2, "portrait", Some("genre")),
                dictionary(3, "untagged", None),
            ])
            .await;
        let service = DictionaryService::new(Arc::new(store), None, 60);

        let styles = service.list(Some("Style")).await.unwrap();
        assert_eq!(styles, vec![dictionary(1, "Cubism", Some("style"))]);
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let mut store = MockArtworkStore::new();
        store
            .expect_list_dictionaries()
            .times(1)
            .returning(|| Err(AppError::Internal("db down".to_string())));
        let service = DictionaryService::new(Arc::new(store), None, 60);

        let result = service.list(None).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    async fn connect(redis: &TestRedis) -> (Cache, crate::db::CacheWriterHandle) {
        let client = create_redis_client(&redis.url()).unwrap();
        Cache::connect(client).await.unwrap()
    }

    #[tokio::test]
    async fn test_miss_fetches_once_then_hit_skips_store() {
        let redis = TestRedis::start().await;
        let (cache, writer) = connect(&redis).await;

        let mut store = MockArtworkStore::new();
        store
            .expect_list_dictionaries()
            .times(1)
            .returning(|| Ok(vec![dictionary(1, "Cubism", Some("style"))]));
        let service = DictionaryService::new(Arc::new(store), Some(cache), 120);

        let first = service.list(None).await.unwrap();
        assert_eq!(first, vec![dictionary(1, "Cubism", Some("style"))]);

        writer.shutdown().await;
        let writes = redis.commands_named("SETEX");
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0][1], "dict:all");
        assert_eq!(writes[0][2], "120");

        // Served from Redis; a second store call would fail the expectation.
        let second = service.list(Some("style")).await.unwrap();
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn test_cache_read_failure_falls_back_to_store() {
        let redis = TestRedis::with_failing_reads().await;
        let (cache, _writer) = connect(&redis).await;

        let store = InMemoryArtworkStore::new();
        store
            .set_dictionaries(vec![dictionary(1, "Cubism", Some("style"))])
            .await;
        let service = DictionaryService::new(Arc::new(store), Some(cache), 120);

        let all = tokio_test::assert_ok!(service.list(None).await);
        assert_eq!(all, vec![dictionary(1, "Cubism", Some("style"))]);
    }
}
