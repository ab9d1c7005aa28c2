use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct RecomputeMetadataCacheRequestResource {
    #[serde(default)]
    pub ignore_lock: bool,
}
