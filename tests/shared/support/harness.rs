use std::{sync::Arc, time::Duration};

use workspace_datasource_api::shared::infrastructure::cache::versioned_resource_cache::VersionedResourceCache;

use super::fakes::{FakeCacheError, FakeResource, FakeResourceFactory};

pub struct CacheTestHarness {
    pub factory: Arc<FakeResourceFactory>,
    pub cache: VersionedResourceCache<String, Arc<FakeResource>, FakeCacheError>,
}

impl CacheTestHarness {
    pub async fn get(&self, key: &str) -> Result<Arc<FakeResource>, FakeCacheError> {
        let builder = Arc::clone(&self.factory);
        let disposer = Arc::clone(&self.factory);
        let build_key = key.to_string();

        self.cache
            .get_or_create(
                &key.to_string(),
                move || builder.build(&build_key),
                move |resource| disposer.dispose(resource),
            )
            .await
    }

    pub async fn evict(&self, key: &str) -> Result<(), FakeCacheError> {
        self.cache.evict(&key.to_string()).await
    }
}

pub fn create_harness(build_delay: Duration) -> CacheTestHarness {
    create_harness_failing_first(build_delay, 0)
}

pub fn create_harness_failing_first(build_delay: Duration, failures: usize) -> CacheTestHarness {
    CacheTestHarness {
        factory: Arc::new(FakeResourceFactory::new(build_delay, failures)),
        cache: VersionedResourceCache::new(),
    }
}
