use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    shared::domain::model::value_objects::{
        metadata_version::MetadataVersion, workspace_id::WorkspaceId,
    },
    workspace_metadata::domain::model::{
        commands::recompute_metadata_cache_command::RecomputeMetadataCacheCommand,
        entities::object_metadata::ObjectMetadataMaps,
        enums::workspace_metadata_domain_error::WorkspaceMetadataDomainError,
    },
};

#[async_trait]
pub trait WorkspaceMetadataCacheService: Send + Sync {
    /// Currently published version, `None` while unknown. Never touches the
    /// database.
    async fn get_metadata_version(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Option<MetadataVersion>, WorkspaceMetadataDomainError>;

    async fn get_object_metadata_maps(
        &self,
        workspace_id: &WorkspaceId,
        metadata_version: MetadataVersion,
    ) -> Result<Option<Arc<ObjectMetadataMaps>>, WorkspaceMetadataDomainError>;

    /// Reloads the workspace metadata and publishes its version. Returns the
    /// published version, or `None` when the workspace has none yet.
    async fn recompute_metadata_cache(
        &self,
        command: RecomputeMetadataCacheCommand,
    ) -> Result<Option<MetadataVersion>, WorkspaceMetadataDomainError>;
}
