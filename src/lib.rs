pub mod config;
pub mod database_credentials;
pub mod shared;
pub mod workspace_datasource;
pub mod workspace_metadata;
