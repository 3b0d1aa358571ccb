use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("moka", MokaCacheWrapper);

/// 进程内缓存，条目过期时间取 `cache.default_ttl`
pub struct MokaCacheWrapper {
    inner: Cache<String, String>,
}

impl MokaCacheWrapper {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        Ok(Self::with_settings(
            config.cache.memory.max_capacity,
            config.cache.default_ttl,
        ))
    }

    pub fn with_settings(max_capacity: u64, ttl_secs: u64) -> Self {
        if max_capacity == 0 {
            debug!("Moka cache capacity is 0, entries will be evicted immediately");
        }
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs.max(1)))
            .build();
        debug!(
            "Moka cache ready (capacity: {}, ttl: {}s)",
            max_capacity, ttl_secs
        );
        Self { inner }
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(value) => CacheResult::Found(value),
            None => CacheResult::NotFound,
        }
    }

    // 过期策略在构建时统一设定，单条 ttl 不生效
    async fn insert_raw(&self, key: String, value: String, _ttl: u64) {
        self.inner.insert(key, value).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{get_json, insert_json, user_cache_key};

    #[tokio::test]
    async fn test_json_helpers_and_removal() {
        let cache = MokaCacheWrapper::with_settings(100, 60);
        let key = user_cache_key(7);
        insert_json(&cache, key.clone(), &vec![1, 2, 3], 0).await;
        assert_eq!(get_json::<Vec<i32>>(&cache, &key).await, Some(vec![1, 2, 3]));

        cache.remove(&key).await;
        assert_eq!(cache.get_raw(&key).await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_malformed_entry_is_discarded() {
        let cache = MokaCacheWrapper::with_settings(100, 60);
        cache
            .insert_raw("user:1".to_string(), "not json".to_string(), 0)
            .await;
        assert_eq!(get_json::<Vec<i32>>(&cache, "user:1").await, None);
        assert_eq!(cache.get_raw("user:1").await, CacheResult::NotFound);
    }
}
