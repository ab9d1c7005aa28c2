use std::{collections::HashMap, sync::Mutex, time::Duration};

use async_trait::async_trait;
use workspace_datasource_api::{
    shared::domain::model::value_objects::workspace_id::WorkspaceId,
    workspace_metadata::{
        domain::model::{
            entities::object_metadata::ObjectMetadata,
            enums::workspace_metadata_domain_error::WorkspaceMetadataDomainError,
        },
        infrastructure::persistence::repositories::workspace_metadata_repository::WorkspaceMetadataRepository,
    },
};

use super::fixtures::company_object;

#[derive(Default)]
struct FakeWorkspaceMetadataRepositoryState {
    versions: HashMap<String, i64>,
    version_reads: usize,
    object_reads: usize,
    failing: bool,
}

pub struct FakeWorkspaceMetadataRepository {
    state: Mutex<FakeWorkspaceMetadataRepositoryState>,
    read_delay: Duration,
}

impl FakeWorkspaceMetadataRepository {
    pub fn new(read_delay: Duration) -> Self {
        Self {
            state: Mutex::new(FakeWorkspaceMetadataRepositoryState::default()),
            read_delay,
        }
    }

    pub fn set_version(&self, workspace_id: &str, version: i64) {
        self.state
            .lock()
            .expect("mutex poisoned")
            .versions
            .insert(workspace_id.to_string(), version);
    }

    pub fn set_failing(&self, failing: bool) {
        self.state.lock().expect("mutex poisoned").failing = failing;
    }

    pub fn stats(&self) -> (usize, usize) {
        let state = self.state.lock().expect("mutex poisoned");
        (state.version_reads, state.object_reads)
    }
}

#[async_trait]
impl WorkspaceMetadataRepository for FakeWorkspaceMetadataRepository {
    async fn find_metadata_version(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Option<i64>, WorkspaceMetadataDomainError> {
        tokio::time::sleep(self.read_delay).await;

        let mut state = self.state.lock().expect("mutex poisoned");
        state.version_reads += 1;
        if state.failing {
            return Err(WorkspaceMetadataDomainError::InfrastructureError(
                "database unavailable".to_string(),
            ));
        }
        Ok(state.versions.get(workspace_id.value()).copied())
    }

    async fn find_object_metadata(
        &self,
        _workspace_id: &WorkspaceId,
    ) -> Result<Vec<ObjectMetadata>, WorkspaceMetadataDomainError> {
        self.state.lock().expect("mutex poisoned").object_reads += 1;
        Ok(vec![company_object()])
    }
}
