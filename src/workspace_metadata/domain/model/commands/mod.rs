pub mod recompute_metadata_cache_command;
