use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    shared::domain::model::value_objects::{
        metadata_version::MetadataVersion, workspace_id::WorkspaceId,
    },
    workspace_datasource::domain::model::enums::workspace_datasource_domain_error::WorkspaceDatasourceDomainError,
};

#[derive(Clone, Debug)]
pub struct FieldMetadataSnapshot {
    pub name: String,
    pub field_type: String,
    pub is_nullable: bool,
}

#[derive(Clone, Debug)]
pub struct ObjectMetadataSnapshot {
    pub id: Uuid,
    pub name_singular: String,
    pub is_custom: bool,
    pub fields: Vec<FieldMetadataSnapshot>,
}

#[async_trait]
pub trait WorkspaceMetadataFacade: Send + Sync {
    async fn get_metadata_version(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Option<MetadataVersion>, WorkspaceDatasourceDomainError>;

    async fn recompute_metadata_version(
        &self,
        workspace_id: &WorkspaceId,
        ignore_lock: bool,
    ) -> Result<Option<MetadataVersion>, WorkspaceDatasourceDomainError>;

    async fn get_object_metadata(
        &self,
        workspace_id: &WorkspaceId,
        metadata_version: MetadataVersion,
    ) -> Result<Option<Vec<ObjectMetadataSnapshot>>, WorkspaceDatasourceDomainError>;
}
