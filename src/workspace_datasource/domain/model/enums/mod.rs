pub mod metadata_version_resolution;
pub mod workspace_datasource_domain_error;
