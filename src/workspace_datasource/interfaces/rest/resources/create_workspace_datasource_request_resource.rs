use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateWorkspaceDatasourceRequestResource {
    #[validate(range(min = 1))]
    pub expected_metadata_version: Option<i64>,
    /// Defaults to `true`.
    pub fail_on_metadata_cache_miss: Option<bool>,
}
