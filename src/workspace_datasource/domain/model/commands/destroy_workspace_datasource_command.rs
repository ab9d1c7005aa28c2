use crate::{
    shared::domain::model::value_objects::workspace_id::WorkspaceId,
    workspace_datasource::domain::model::enums::workspace_datasource_domain_error::WorkspaceDatasourceDomainError,
};

#[derive(Clone, Debug)]
pub struct DestroyWorkspaceDatasourceCommand {
    workspace_id: WorkspaceId,
}

impl DestroyWorkspaceDatasourceCommand {
    pub fn new(workspace_id: String) -> Result<Self, WorkspaceDatasourceDomainError> {
        Ok(Self {
            workspace_id: WorkspaceId::new(workspace_id)?,
        })
    }

    pub fn workspace_id(&self) -> &WorkspaceId {
        &self.workspace_id
    }
}
