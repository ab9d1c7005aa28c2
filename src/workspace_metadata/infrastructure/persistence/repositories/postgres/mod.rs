pub mod sqlx_workspace_metadata_repository_impl;
