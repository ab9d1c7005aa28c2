use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct WorkspaceMetadataErrorResponseResource {
    pub message: String,
}
