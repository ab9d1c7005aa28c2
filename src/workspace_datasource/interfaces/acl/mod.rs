pub mod workspace_metadata_facade;
