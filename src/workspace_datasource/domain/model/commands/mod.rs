pub mod create_workspace_datasource_command;
pub mod destroy_workspace_datasource_command;
