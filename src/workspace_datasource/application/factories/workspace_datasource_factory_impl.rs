use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::{
    shared::{
        domain::model::value_objects::{
            metadata_version::MetadataVersion, workspace_id::WorkspaceId,
        },
        infrastructure::cache::versioned_resource_cache::{
            DisposalError, VersionedResourceCache,
        },
    },
    workspace_datasource::{
        domain::{
            model::{
                commands::{
                    create_workspace_datasource_command::CreateWorkspaceDatasourceCommand,
                    destroy_workspace_datasource_command::DestroyWorkspaceDatasourceCommand,
                },
                entities::{
                    entity_mapping_set::EntityMappingSet,
                    workspace_data_source::WorkspaceDataSource,
                },
                enums::{
                    metadata_version_resolution::MetadataVersionResolution,
                    workspace_datasource_domain_error::WorkspaceDatasourceDomainError,
                },
                value_objects::datasource_cache_key::DatasourceCacheKey,
            },
            services::workspace_datasource_factory::WorkspaceDatasourceFactory,
        },
        infrastructure::persistence::repositories::{
            data_source_metadata_repository::DataSourceMetadataRepository,
            workspace_connection_builder_repository::{
                WorkspaceConnectionBuilderRepository, WorkspaceConnectionRequest,
            },
        },
        interfaces::acl::workspace_metadata_facade::WorkspaceMetadataFacade,
    },
};

type DatasourceCache = VersionedResourceCache<
    DatasourceCacheKey,
    Arc<WorkspaceDataSource>,
    WorkspaceDatasourceDomainError,
>;
type EntityMappingCache =
    VersionedResourceCache<DatasourceCacheKey, Arc<EntityMappingSet>, WorkspaceDatasourceDomainError>;

pub struct WorkspaceDatasourceFactoryImpl {
    metadata_facade: Arc<dyn WorkspaceMetadataFacade>,
    build_context: DatasourceBuildContext,
}

/// Everything a build needs, cloned into each build future so the future
/// does not borrow the factory.
#[derive(Clone)]
struct DatasourceBuildContext {
    metadata_facade: Arc<dyn WorkspaceMetadataFacade>,
    data_source_metadata_repository: Arc<dyn DataSourceMetadataRepository>,
    connection_builder: Arc<dyn WorkspaceConnectionBuilderRepository>,
    datasources: Arc<DatasourceCache>,
    entity_mappings: Arc<EntityMappingCache>,
    build_timeout: Duration,
}

impl WorkspaceDatasourceFactoryImpl {
    pub fn new(
        metadata_facade: Arc<dyn WorkspaceMetadataFacade>,
        data_source_metadata_repository: Arc<dyn DataSourceMetadataRepository>,
        connection_builder: Arc<dyn WorkspaceConnectionBuilderRepository>,
        build_timeout: Duration,
    ) -> Self {
        Self {
            metadata_facade: Arc::clone(&metadata_facade),
            build_context: DatasourceBuildContext {
                metadata_facade,
                data_source_metadata_repository,
                connection_builder,
                datasources: Arc::new(VersionedResourceCache::new()),
                entity_mappings: Arc::new(VersionedResourceCache::new()),
                build_timeout,
            },
        }
    }

    /// Number of datasource entries, pending or live.
    pub fn cached_datasource_count(&self) -> usize {
        self.build_context.datasources.len()
    }

    pub fn cached_entity_mapping_count(&self) -> usize {
        self.build_context.entity_mappings.len()
    }

    async fn resolve_metadata_version(
        &self,
        workspace_id: &WorkspaceId,
        fail_on_metadata_cache_miss: bool,
    ) -> Result<MetadataVersion, WorkspaceDatasourceDomainError> {
        let mut resolution = MetadataVersionResolution::from_lookup(
            self.metadata_facade.get_metadata_version(workspace_id).await?,
        );

        loop {
            resolution = match resolution {
                MetadataVersionResolution::Resolved(version) => return Ok(version),
                MetadataVersionResolution::StillUnknown => {
                    return Err(WorkspaceDatasourceDomainError::MetadataVersionNotFound {
                        workspace_id: workspace_id.to_string(),
                    });
                }
                MetadataVersionResolution::Unknown => {
                    debug!(
                        workspace_id = %workspace_id,
                        strict = fail_on_metadata_cache_miss,
                        "metadata version not cached, recomputing"
                    );
                    match self
                        .metadata_facade
                        .recompute_metadata_version(workspace_id, !fail_on_metadata_cache_miss)
                        .await
                    {
                        Ok(_) => MetadataVersionResolution::Recomputing,
                        Err(error) if fail_on_metadata_cache_miss => {
                            warn!(workspace_id = %workspace_id, error = %error, "metadata recompute failed");
                            MetadataVersionResolution::StillUnknown
                        }
                        Err(error) => return Err(error),
                    }
                }
                // A strict caller does not trust a version published by a
                // recompute it triggered itself.
                MetadataVersionResolution::Recomputing if fail_on_metadata_cache_miss => {
                    MetadataVersionResolution::StillUnknown
                }
                MetadataVersionResolution::Recomputing => {
                    MetadataVersionResolution::after_recompute_lookup(
                        self.metadata_facade.get_metadata_version(workspace_id).await?,
                    )
                }
            };
        }
    }
}

#[async_trait]
impl WorkspaceDatasourceFactory for WorkspaceDatasourceFactoryImpl {
    async fn create(
        &self,
        command: CreateWorkspaceDatasourceCommand,
    ) -> Result<Arc<WorkspaceDataSource>, WorkspaceDatasourceDomainError> {
        let workspace_id = command.workspace_id();
        let current_version = self
            .resolve_metadata_version(workspace_id, command.fail_on_metadata_cache_miss())
            .await?;

        if let Some(expected_version) = command.expected_metadata_version() {
            if expected_version != current_version {
                return Err(WorkspaceDatasourceDomainError::MetadataVersionMismatch {
                    workspace_id: workspace_id.to_string(),
                    current: current_version.value(),
                    expected: expected_version.value(),
                });
            }
        }

        let key = DatasourceCacheKey::new(workspace_id.clone(), current_version);
        let build_key = key.clone();
        let build_context = self.build_context.clone();
        let connection_builder = Arc::clone(&self.build_context.connection_builder);

        let data_source = self
            .build_context
            .datasources
            .get_or_create(
                &key,
                move || build_context.clone().build_data_source(build_key.clone()),
                move |data_source| dispose_data_source(Arc::clone(&connection_builder), data_source),
            )
            .await?;

        self.build_context.spawn_supersession(workspace_id.clone());
        Ok(data_source)
    }

    async fn destroy(
        &self,
        command: DestroyWorkspaceDatasourceCommand,
    ) -> Result<(), WorkspaceDatasourceDomainError> {
        let workspace_id = command.workspace_id();
        let Some(version) = self.metadata_facade.get_metadata_version(workspace_id).await? else {
            debug!(workspace_id = %workspace_id, "no cached metadata version, nothing to destroy");
            return Ok(());
        };

        let key = DatasourceCacheKey::new(workspace_id.clone(), version);
        self.build_context.datasources.evict(&key).await?;

        info!(workspace_id = %workspace_id, metadata_version = %version, "workspace datasource destroyed");
        Ok(())
    }

    async fn shutdown(&self) -> Result<usize, WorkspaceDatasourceDomainError> {
        let disposed = self.build_context.datasources.drain().await;
        let mappings = self.build_context.entity_mappings.drain().await;

        let disposed = disposed?;
        mappings?;

        info!(disposed, "workspace datasources drained");
        Ok(disposed)
    }
}

impl DatasourceBuildContext {
    async fn build_data_source(
        self,
        key: DatasourceCacheKey,
    ) -> Result<Arc<WorkspaceDataSource>, WorkspaceDatasourceDomainError> {
        let workspace_id = key.workspace_id().to_string();
        let version = key.metadata_version().value();

        let outcome = tokio::time::timeout(self.build_timeout, self.assemble(&key))
            .await
            .unwrap_or_else(|_| {
                Err(WorkspaceDatasourceDomainError::BuildFailure {
                    workspace_id: workspace_id.clone(),
                    version,
                    reason: format!("timed out after {}ms", self.build_timeout.as_millis()),
                })
            });

        let data_source = match outcome {
            Ok(data_source) => Arc::new(data_source),
            Err(error) => {
                let error = error.into_build_failure(&workspace_id, version);
                warn!(workspace_id = %workspace_id, metadata_version = version, error = %error, "workspace datasource build failed");
                return Err(error);
            }
        };

        info!(workspace_id = %workspace_id, metadata_version = version, "workspace datasource created");
        Ok(data_source)
    }

    async fn assemble(
        &self,
        key: &DatasourceCacheKey,
    ) -> Result<WorkspaceDataSource, WorkspaceDatasourceDomainError> {
        let data_source = self
            .data_source_metadata_repository
            .find_last_by_workspace_id(key.workspace_id())
            .await?
            .ok_or_else(|| WorkspaceDatasourceDomainError::WorkspaceSchemaNotFound {
                workspace_id: key.workspace_id().to_string(),
            })?;

        let entity_mappings = self.entity_mappings_for(key).await?;

        self.connection_builder
            .build(WorkspaceConnectionRequest {
                workspace_id: key.workspace_id().clone(),
                metadata_version: key.metadata_version(),
                data_source,
                entity_mappings,
            })
            .await
    }

    async fn entity_mappings_for(
        &self,
        key: &DatasourceCacheKey,
    ) -> Result<Arc<EntityMappingSet>, WorkspaceDatasourceDomainError> {
        let metadata_facade = Arc::clone(&self.metadata_facade);
        let connection_builder = Arc::clone(&self.connection_builder);
        let mapping_key = key.clone();

        self.entity_mappings
            .get_or_create(
                key,
                move || {
                    let metadata_facade = Arc::clone(&metadata_facade);
                    let connection_builder = Arc::clone(&connection_builder);
                    let key = mapping_key.clone();
                    async move {
                        let objects = metadata_facade
                            .get_object_metadata(key.workspace_id(), key.metadata_version())
                            .await?
                            .ok_or_else(|| {
                                WorkspaceDatasourceDomainError::MetadataCollectionNotFound {
                                    workspace_id: key.workspace_id().to_string(),
                                    version: key.metadata_version().value(),
                                }
                            })?;

                        connection_builder
                            .build_entity_mappings(
                                key.workspace_id(),
                                key.metadata_version(),
                                &objects,
                            )
                            .await
                            .map(Arc::new)
                    }
                },
                |_| async { Ok::<(), WorkspaceDatasourceDomainError>(()) },
            )
            .await
    }

    /// Disposes superseded versions in the background. Closing a pool waits
    /// for its checked-out connections, which must not hold up the caller.
    fn spawn_supersession(&self, workspace_id: WorkspaceId) {
        let context = self.clone();
        tokio::spawn(async move { context.supersede_stale_versions(&workspace_id).await });
    }

    /// Evicts every entry of the workspace older than its newest ready
    /// datasource, including a stale build that finished after a newer one.
    async fn supersede_stale_versions(&self, workspace_id: &WorkspaceId) {
        let Some(newest) = self
            .datasources
            .ready_keys()
            .into_iter()
            .filter(|key| key.workspace_id() == workspace_id)
            .max_by_key(|key| key.metadata_version().value())
        else {
            return;
        };

        match self
            .datasources
            .evict_matching(|candidate| candidate.is_superseded_by(&newest))
            .await
        {
            Ok(0) => {}
            Ok(superseded) => info!(
                workspace_id = %workspace_id,
                metadata_version = %newest.metadata_version(),
                superseded,
                "superseded workspace datasources disposed"
            ),
            Err(error) => warn!(
                workspace_id = %workspace_id,
                metadata_version = %newest.metadata_version(),
                error = %error,
                "failed to dispose superseded workspace datasource"
            ),
        }

        if let Err(error) = self
            .entity_mappings
            .evict_matching(|candidate| candidate.is_superseded_by(&newest))
            .await
        {
            warn!(workspace_id = %workspace_id, error = %error, "failed to drop superseded entity mappings");
        }
    }
}

async fn dispose_data_source(
    connection_builder: Arc<dyn WorkspaceConnectionBuilderRepository>,
    data_source: Arc<WorkspaceDataSource>,
) -> Result<(), WorkspaceDatasourceDomainError> {
    let workspace_id = data_source.workspace_id().to_string();
    let version = data_source.metadata_version().value();

    connection_builder
        .dispose(data_source)
        .await
        .map_err(|error| {
            if error.is_already_released() {
                error
            } else {
                WorkspaceDatasourceDomainError::DisposeFailure {
                    workspace_id,
                    version,
                    reason: error.to_string(),
                }
            }
        })
}
