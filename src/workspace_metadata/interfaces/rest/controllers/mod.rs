pub mod workspace_metadata_rest_controller;
