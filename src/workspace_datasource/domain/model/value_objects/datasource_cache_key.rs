use std::fmt::{Display, Formatter};

use crate::shared::domain::model::value_objects::{
    metadata_version::MetadataVersion, workspace_id::WorkspaceId,
};

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DatasourceCacheKey {
    workspace_id: WorkspaceId,
    metadata_version: MetadataVersion,
}

impl DatasourceCacheKey {
    pub fn new(workspace_id: WorkspaceId, metadata_version: MetadataVersion) -> Self {
        Self {
            workspace_id,
            metadata_version,
        }
    }

    pub fn workspace_id(&self) -> &WorkspaceId {
        &self.workspace_id
    }

    pub fn metadata_version(&self) -> MetadataVersion {
        self.metadata_version
    }

    /// True for keys of the same workspace at an older version.
    pub fn is_superseded_by(&self, newer: &Self) -> bool {
        self.workspace_id == newer.workspace_id && self.metadata_version < newer.metadata_version
    }
}

impl Display for DatasourceCacheKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.workspace_id, self.metadata_version)
    }
}
