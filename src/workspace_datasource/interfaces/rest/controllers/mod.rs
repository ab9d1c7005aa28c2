pub mod workspace_datasource_rest_controller;
