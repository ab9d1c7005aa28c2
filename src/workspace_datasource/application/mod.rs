pub mod acl;
pub mod factories;
