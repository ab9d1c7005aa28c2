pub mod postgres;
pub mod workspace_metadata_repository;
