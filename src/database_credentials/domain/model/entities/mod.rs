pub mod access_token;
pub mod database_credentials;
