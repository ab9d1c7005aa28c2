pub mod versioned_resource_cache;
