use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    shared::domain::model::value_objects::{
        metadata_version::MetadataVersion, workspace_id::WorkspaceId,
    },
    workspace_datasource::{
        domain::model::{
            entities::{
                data_source_metadata::DataSourceMetadata, entity_mapping_set::EntityMappingSet,
                workspace_data_source::WorkspaceDataSource,
            },
            enums::workspace_datasource_domain_error::WorkspaceDatasourceDomainError,
        },
        interfaces::acl::workspace_metadata_facade::ObjectMetadataSnapshot,
    },
};

#[derive(Clone, Debug)]
pub struct WorkspaceConnectionRequest {
    pub workspace_id: WorkspaceId,
    pub metadata_version: MetadataVersion,
    pub data_source: DataSourceMetadata,
    pub entity_mappings: Arc<EntityMappingSet>,
}

#[async_trait]
pub trait WorkspaceConnectionBuilderRepository: Send + Sync {
    async fn build_entity_mappings(
        &self,
        workspace_id: &WorkspaceId,
        metadata_version: MetadataVersion,
        objects: &[ObjectMetadataSnapshot],
    ) -> Result<EntityMappingSet, WorkspaceDatasourceDomainError> {
        Ok(EntityMappingSet::from_object_metadata(
            workspace_id.clone(),
            metadata_version,
            objects,
        ))
    }

    /// Opens and warms up the pool. Expensive.
    async fn build(
        &self,
        request: WorkspaceConnectionRequest,
    ) -> Result<WorkspaceDataSource, WorkspaceDatasourceDomainError>;

    /// Closes the pool. Reports `DatasourceAlreadyReleased` when it was
    /// closed already.
    async fn dispose(
        &self,
        data_source: Arc<WorkspaceDataSource>,
    ) -> Result<(), WorkspaceDatasourceDomainError>;
}
