use async_trait::async_trait;
use tokio::sync::watch;

use crate::database_credentials::domain::model::{
    entities::database_credentials::DatabaseCredentials,
    enums::database_credentials_domain_error::DatabaseCredentialsDomainError,
    value_objects::credential_scope::CredentialScope,
};

#[async_trait]
pub trait DatabaseCredentialsProvider: Send + Sync {
    async fn get_credentials(
        &self,
        scope: &CredentialScope,
    ) -> Result<DatabaseCredentials, DatabaseCredentialsDomainError>;

    /// Receives every credential set the provider publishes, including
    /// proactive refreshes, so open pools can re-authenticate in place.
    fn subscribe(&self) -> watch::Receiver<Option<DatabaseCredentials>>;
}
