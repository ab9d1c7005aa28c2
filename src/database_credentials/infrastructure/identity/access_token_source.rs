use async_trait::async_trait;

use crate::database_credentials::domain::model::{
    entities::access_token::AccessToken,
    enums::database_credentials_domain_error::DatabaseCredentialsDomainError,
    value_objects::credential_scope::CredentialScope,
};

#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn fetch_token(
        &self,
        scope: &CredentialScope,
    ) -> Result<AccessToken, DatabaseCredentialsDomainError>;
}
