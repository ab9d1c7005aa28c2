use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::workspace_datasource::domain::model::entities::workspace_data_source::WorkspaceDataSource;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct WorkspaceDatasourceResource {
    pub workspace_id: String,
    pub metadata_version: i64,
    pub schema_name: String,
    pub entity_count: usize,
    pub pool_size: u32,
    pub created_at: String,
}

impl From<&WorkspaceDataSource> for WorkspaceDatasourceResource {
    fn from(data_source: &WorkspaceDataSource) -> Self {
        Self {
            workspace_id: data_source.workspace_id().to_string(),
            metadata_version: data_source.metadata_version().value(),
            schema_name: data_source.schema_name().to_string(),
            entity_count: data_source.entity_mappings().len(),
            pool_size: data_source.pool().size(),
            created_at: data_source.created_at().to_rfc3339(),
        }
    }
}
