use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, PoisonError},
};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::{
    shared::domain::model::value_objects::{
        metadata_version::MetadataVersion, workspace_id::WorkspaceId,
    },
    workspace_metadata::{
        domain::{
            model::{
                commands::recompute_metadata_cache_command::RecomputeMetadataCacheCommand,
                entities::object_metadata::ObjectMetadataMaps,
                enums::workspace_metadata_domain_error::WorkspaceMetadataDomainError,
            },
            services::workspace_metadata_cache_service::WorkspaceMetadataCacheService,
        },
        infrastructure::persistence::repositories::workspace_metadata_repository::WorkspaceMetadataRepository,
    },
};

type RecomputeLocks = Arc<Mutex<HashSet<WorkspaceId>>>;

pub struct WorkspaceMetadataCacheServiceImpl {
    repository: Arc<dyn WorkspaceMetadataRepository>,
    versions: RwLock<HashMap<WorkspaceId, MetadataVersion>>,
    object_metadata_maps: RwLock<HashMap<(WorkspaceId, MetadataVersion), Arc<ObjectMetadataMaps>>>,
    recompute_locks: RecomputeLocks,
}

struct RecomputeLockGuard {
    locks: RecomputeLocks,
    workspace_id: WorkspaceId,
}

impl Drop for RecomputeLockGuard {
    fn drop(&mut self) {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.workspace_id);
    }
}

impl WorkspaceMetadataCacheServiceImpl {
    pub fn new(repository: Arc<dyn WorkspaceMetadataRepository>) -> Self {
        Self {
            repository,
            versions: RwLock::new(HashMap::new()),
            object_metadata_maps: RwLock::new(HashMap::new()),
            recompute_locks: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    fn try_acquire_recompute_lock(&self, workspace_id: &WorkspaceId) -> Option<RecomputeLockGuard> {
        let acquired = self
            .recompute_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(workspace_id.clone());

        acquired.then(|| RecomputeLockGuard {
            locks: Arc::clone(&self.recompute_locks),
            workspace_id: workspace_id.clone(),
        })
    }

    async fn is_published(&self, workspace_id: &WorkspaceId, version: MetadataVersion) -> bool {
        let version_matches = self.versions.read().await.get(workspace_id) == Some(&version);
        version_matches
            && self
                .object_metadata_maps
                .read()
                .await
                .contains_key(&(workspace_id.clone(), version))
    }
}

#[async_trait]
impl WorkspaceMetadataCacheService for WorkspaceMetadataCacheServiceImpl {
    async fn get_metadata_version(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Option<MetadataVersion>, WorkspaceMetadataDomainError> {
        Ok(self.versions.read().await.get(workspace_id).copied())
    }

    async fn get_object_metadata_maps(
        &self,
        workspace_id: &WorkspaceId,
        metadata_version: MetadataVersion,
    ) -> Result<Option<Arc<ObjectMetadataMaps>>, WorkspaceMetadataDomainError> {
        Ok(self
            .object_metadata_maps
            .read()
            .await
            .get(&(workspace_id.clone(), metadata_version))
            .cloned())
    }

    async fn recompute_metadata_cache(
        &self,
        command: RecomputeMetadataCacheCommand,
    ) -> Result<Option<MetadataVersion>, WorkspaceMetadataDomainError> {
        let workspace_id = command.workspace_id();

        let _lock = match self.try_acquire_recompute_lock(workspace_id) {
            Some(guard) => Some(guard),
            None if command.ignore_lock() => {
                debug!(workspace_id = %workspace_id, "recompute lock held, proceeding anyway");
                None
            }
            None => {
                return Err(WorkspaceMetadataDomainError::RecomputeLocked(
                    workspace_id.to_string(),
                ));
            }
        };

        // Zero is what a freshly created workspace carries before its first
        // metadata sync.
        let stored_version = self
            .repository
            .find_metadata_version(workspace_id)
            .await?
            .filter(|version| *version > 0);

        let Some(stored_version) = stored_version else {
            warn!(workspace_id = %workspace_id, "workspace has no metadata version yet");
            return Ok(None);
        };
        let version = MetadataVersion::new(stored_version)?;

        if self.is_published(workspace_id, version).await {
            return Ok(Some(version));
        }

        let objects = self.repository.find_object_metadata(workspace_id).await?;
        let maps = Arc::new(ObjectMetadataMaps::new(objects));
        let object_count = maps.len();

        {
            let mut object_metadata_maps = self.object_metadata_maps.write().await;
            object_metadata_maps
                .retain(|(cached_workspace, cached_version), _| {
                    cached_workspace != workspace_id || *cached_version == version
                });
            object_metadata_maps.insert((workspace_id.clone(), version), maps);
        }
        self.versions
            .write()
            .await
            .insert(workspace_id.clone(), version);

        info!(
            workspace_id = %workspace_id,
            metadata_version = %version,
            object_count,
            "workspace metadata cache recomputed"
        );

        Ok(Some(version))
    }
}
