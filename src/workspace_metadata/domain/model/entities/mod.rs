pub mod object_metadata;
