use std::sync::Arc;

use async_trait::async_trait;

use crate::workspace_datasource::domain::model::{
    commands::{
        create_workspace_datasource_command::CreateWorkspaceDatasourceCommand,
        destroy_workspace_datasource_command::DestroyWorkspaceDatasourceCommand,
    },
    entities::workspace_data_source::WorkspaceDataSource,
    enums::workspace_datasource_domain_error::WorkspaceDatasourceDomainError,
};

#[async_trait]
pub trait WorkspaceDatasourceFactory: Send + Sync {
    /// Returns the shared datasource for the workspace's current metadata
    /// version, building it if no live one exists.
    async fn create(
        &self,
        command: CreateWorkspaceDatasourceCommand,
    ) -> Result<Arc<WorkspaceDataSource>, WorkspaceDatasourceDomainError>;

    /// Disposes the datasource of the workspace's current version. The entry
    /// is gone afterwards even when disposal reports an error.
    async fn destroy(
        &self,
        command: DestroyWorkspaceDatasourceCommand,
    ) -> Result<(), WorkspaceDatasourceDomainError>;

    /// Disposes every cached datasource and returns how many were closed.
    async fn shutdown(&self) -> Result<usize, WorkspaceDatasourceDomainError>;
}
