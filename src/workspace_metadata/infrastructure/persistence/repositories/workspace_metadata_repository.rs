use async_trait::async_trait;

use crate::{
    shared::domain::model::value_objects::workspace_id::WorkspaceId,
    workspace_metadata::domain::model::{
        entities::object_metadata::ObjectMetadata,
        enums::workspace_metadata_domain_error::WorkspaceMetadataDomainError,
    },
};

#[async_trait]
pub trait WorkspaceMetadataRepository: Send + Sync {
    async fn find_metadata_version(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Option<i64>, WorkspaceMetadataDomainError>;

    async fn find_object_metadata(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Vec<ObjectMetadata>, WorkspaceMetadataDomainError>;
}
