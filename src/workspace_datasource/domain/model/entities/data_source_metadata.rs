use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    shared::domain::model::value_objects::workspace_id::WorkspaceId,
    workspace_datasource::domain::model::value_objects::schema_name::SchemaName,
};

/// Connection coordinates registered for a workspace. Absent fields fall back
/// to the process-wide database settings.
#[derive(Clone, Debug)]
pub struct DataSourceMetadata {
    pub id: Uuid,
    pub workspace_id: WorkspaceId,
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub database: Option<String>,
    pub schema: SchemaName,
    pub created_at: DateTime<Utc>,
}
