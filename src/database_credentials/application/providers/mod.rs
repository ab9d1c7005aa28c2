pub mod refreshing_database_credentials_provider_impl;
