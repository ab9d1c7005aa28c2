pub mod workspace_metadata_domain_error;
