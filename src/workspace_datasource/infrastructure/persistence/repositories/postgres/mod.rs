pub mod sqlx_data_source_metadata_repository_impl;
pub mod sqlx_workspace_connection_builder_repository_impl;
