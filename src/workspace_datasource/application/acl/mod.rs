pub mod workspace_metadata_facade_real_impl;
