pub mod credential_scope;
