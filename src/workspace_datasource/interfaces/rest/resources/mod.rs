pub mod create_workspace_datasource_request_resource;
pub mod workspace_datasource_error_response_resource;
pub mod workspace_datasource_resource;
