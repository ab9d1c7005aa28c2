pub mod database_credentials_provider;
