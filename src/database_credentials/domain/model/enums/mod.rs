pub mod database_credentials_domain_error;
