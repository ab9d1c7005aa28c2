use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct MetadataVersionResource {
    pub workspace_id: String,
    /// Absent while the version is unknown.
    pub metadata_version: Option<i64>,
}
