use crate::{
    shared::domain::model::value_objects::{
        metadata_version::MetadataVersion, workspace_id::WorkspaceId,
    },
    workspace_datasource::domain::model::enums::workspace_datasource_domain_error::WorkspaceDatasourceDomainError,
};

#[derive(Clone, Debug)]
pub struct CreateWorkspaceDatasourceCommand {
    workspace_id: WorkspaceId,
    expected_metadata_version: Option<MetadataVersion>,
    fail_on_metadata_cache_miss: bool,
}

impl CreateWorkspaceDatasourceCommand {
    pub fn new(
        workspace_id: String,
        expected_metadata_version: Option<i64>,
        fail_on_metadata_cache_miss: bool,
    ) -> Result<Self, WorkspaceDatasourceDomainError> {
        Ok(Self {
            workspace_id: WorkspaceId::new(workspace_id)?,
            expected_metadata_version: expected_metadata_version
                .map(MetadataVersion::new)
                .transpose()?,
            fail_on_metadata_cache_miss,
        })
    }

    pub fn workspace_id(&self) -> &WorkspaceId {
        &self.workspace_id
    }

    pub fn expected_metadata_version(&self) -> Option<MetadataVersion> {
        self.expected_metadata_version
    }

    pub fn fail_on_metadata_cache_miss(&self) -> bool {
        self.fail_on_metadata_cache_miss
    }
}
