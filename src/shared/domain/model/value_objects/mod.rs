pub mod metadata_version;
pub mod workspace_id;
