pub mod workspace_datasource_factory_impl;
