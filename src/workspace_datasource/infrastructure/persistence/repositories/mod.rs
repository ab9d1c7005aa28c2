pub mod data_source_metadata_repository;
pub mod postgres;
pub mod workspace_connection_builder_repository;
