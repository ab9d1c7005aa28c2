pub mod access_token_claims;
pub mod access_token_source;
pub mod managed_identity_access_token_source_impl;
