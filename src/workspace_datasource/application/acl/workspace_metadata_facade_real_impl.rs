use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    shared::domain::model::value_objects::{
        metadata_version::MetadataVersion, workspace_id::WorkspaceId,
    },
    workspace_datasource::{
        domain::model::enums::workspace_datasource_domain_error::WorkspaceDatasourceDomainError,
        interfaces::acl::workspace_metadata_facade::{
            FieldMetadataSnapshot, ObjectMetadataSnapshot, WorkspaceMetadataFacade,
        },
    },
    workspace_metadata::domain::{
        model::{
            commands::recompute_metadata_cache_command::RecomputeMetadataCacheCommand,
            enums::workspace_metadata_domain_error::WorkspaceMetadataDomainError,
        },
        services::workspace_metadata_cache_service::WorkspaceMetadataCacheService,
    },
};

pub struct WorkspaceMetadataFacadeRealImpl {
    cache_service: Arc<dyn WorkspaceMetadataCacheService>,
}

impl WorkspaceMetadataFacadeRealImpl {
    pub fn new(cache_service: Arc<dyn WorkspaceMetadataCacheService>) -> Self {
        Self { cache_service }
    }
}

#[async_trait]
impl WorkspaceMetadataFacade for WorkspaceMetadataFacadeRealImpl {
    async fn get_metadata_version(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Option<MetadataVersion>, WorkspaceDatasourceDomainError> {
        self.cache_service
            .get_metadata_version(workspace_id)
            .await
            .map_err(map_metadata_error)
    }

    async fn recompute_metadata_version(
        &self,
        workspace_id: &WorkspaceId,
        ignore_lock: bool,
    ) -> Result<Option<MetadataVersion>, WorkspaceDatasourceDomainError> {
        self.cache_service
            .recompute_metadata_cache(RecomputeMetadataCacheCommand::for_workspace(
                workspace_id.clone(),
                ignore_lock,
            ))
            .await
            .map_err(map_metadata_error)
    }

    async fn get_object_metadata(
        &self,
        workspace_id: &WorkspaceId,
        metadata_version: MetadataVersion,
    ) -> Result<Option<Vec<ObjectMetadataSnapshot>>, WorkspaceDatasourceDomainError> {
        let Some(maps) = self
            .cache_service
            .get_object_metadata_maps(workspace_id, metadata_version)
            .await
            .map_err(map_metadata_error)?
        else {
            return Ok(None);
        };

        let mut snapshots = maps
            .objects()
            .map(|object| ObjectMetadataSnapshot {
                id: object.id,
                name_singular: object.name_singular.clone(),
                is_custom: object.is_custom,
                fields: object
                    .fields
                    .iter()
                    .map(|field| FieldMetadataSnapshot {
                        name: field.name.clone(),
                        field_type: field.field_type.clone(),
                        is_nullable: field.is_nullable,
                    })
                    .collect(),
            })
            .collect::<Vec<_>>();
        snapshots.sort_by(|left, right| left.name_singular.cmp(&right.name_singular));

        Ok(Some(snapshots))
    }
}

fn map_metadata_error(error: WorkspaceMetadataDomainError) -> WorkspaceDatasourceDomainError {
    match error {
        WorkspaceMetadataDomainError::RecomputeLocked(workspace_id) => {
            WorkspaceDatasourceDomainError::MetadataRecomputeLocked { workspace_id }
        }
        WorkspaceMetadataDomainError::InvalidWorkspaceId => {
            WorkspaceDatasourceDomainError::InvalidWorkspaceId
        }
        WorkspaceMetadataDomainError::InvalidMetadataVersion => {
            WorkspaceDatasourceDomainError::InvalidMetadataVersion
        }
        WorkspaceMetadataDomainError::InfrastructureError(message) => {
            WorkspaceDatasourceDomainError::InfrastructureError(message)
        }
    }
}
