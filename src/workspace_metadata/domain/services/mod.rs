pub mod workspace_metadata_cache_service;
