pub mod metadata_version_resource;
pub mod recompute_metadata_cache_request_resource;
pub mod workspace_metadata_error_response_resource;
