pub mod data_source_metadata;
pub mod entity_mapping_set;
pub mod workspace_data_source;
