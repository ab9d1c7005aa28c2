use crate::{
    shared::domain::model::value_objects::workspace_id::WorkspaceId,
    workspace_metadata::domain::model::enums::workspace_metadata_domain_error::WorkspaceMetadataDomainError,
};

#[derive(Clone, Debug)]
pub struct RecomputeMetadataCacheCommand {
    workspace_id: WorkspaceId,
    ignore_lock: bool,
}

impl RecomputeMetadataCacheCommand {
    pub fn new(workspace_id: String, ignore_lock: bool) -> Result<Self, WorkspaceMetadataDomainError> {
        Ok(Self {
            workspace_id: WorkspaceId::new(workspace_id)?,
            ignore_lock,
        })
    }

    pub fn for_workspace(workspace_id: WorkspaceId, ignore_lock: bool) -> Self {
        Self {
            workspace_id,
            ignore_lock,
        }
    }

    pub fn workspace_id(&self) -> &WorkspaceId {
        &self.workspace_id
    }

    pub fn ignore_lock(&self) -> bool {
        self.ignore_lock
    }
}
