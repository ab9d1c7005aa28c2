use std::{sync::Arc, time::Duration};

use tracing::info;

use crate::{
    config::app_config::AppConfig,
    database_credentials::{
        application::providers::refreshing_database_credentials_provider_impl::{
            CredentialRefreshPolicy, RefreshingDatabaseCredentialsProviderImpl,
        },
        domain::{
            model::value_objects::credential_scope::CredentialScope,
            services::database_credentials_provider::DatabaseCredentialsProvider,
        },
        infrastructure::identity::managed_identity_access_token_source_impl::ManagedIdentityAccessTokenSourceImpl,
    },
};

pub mod application;
pub mod domain;
pub mod infrastructure;

const TOKEN_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Returns `None` when connections authenticate with the password embedded in
/// their URL. Otherwise starts the managed-identity refresh loop.
pub fn build_database_credentials_provider(
    config: &AppConfig,
) -> Option<Arc<dyn DatabaseCredentialsProvider>> {
    if !config.use_azure_managed_identity {
        return None;
    }

    let token_source = Arc::new(ManagedIdentityAccessTokenSourceImpl::new(
        config.azure_imds_endpoint.clone(),
        config.azure_managed_identity_client_id.clone(),
        TOKEN_REQUEST_TIMEOUT,
    ));
    let provider = Arc::new(RefreshingDatabaseCredentialsProviderImpl::new(
        token_source,
        CredentialScope::postgres(),
        CredentialRefreshPolicy {
            max_jitter: config.credential_refresh_max_jitter(),
            min_delay: config.credential_refresh_min_delay(),
        },
    ));
    provider.spawn_refresh_loop();

    info!(
        client_id = config.azure_managed_identity_client_id.as_deref().unwrap_or("<default>"),
        "managed identity credentials enabled"
    );

    Some(provider)
}
