use async_trait::async_trait;

use crate::{
    shared::domain::model::value_objects::workspace_id::WorkspaceId,
    workspace_datasource::domain::model::{
        entities::data_source_metadata::DataSourceMetadata,
        enums::workspace_datasource_domain_error::WorkspaceDatasourceDomainError,
    },
};

#[async_trait]
pub trait DataSourceMetadataRepository: Send + Sync {
    /// Most recently created data source of the workspace.
    async fn find_last_by_workspace_id(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Option<DataSourceMetadata>, WorkspaceDatasourceDomainError>;
}
