pub mod datasource_cache_key;
pub mod schema_name;
