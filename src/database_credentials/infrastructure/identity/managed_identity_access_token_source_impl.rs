use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;

use crate::database_credentials::{
    domain::model::{
        entities::access_token::AccessToken,
        enums::database_credentials_domain_error::DatabaseCredentialsDomainError,
        value_objects::credential_scope::CredentialScope,
    },
    infrastructure::identity::access_token_source::AccessTokenSource,
};

const IMDS_API_VERSION: &str = "2018-02-01";

#[derive(Debug, Deserialize)]
struct ManagedIdentityTokenResponse {
    access_token: String,
    expires_on: String,
}

/// Fetches tokens from the instance metadata service of a host running with a
/// managed identity.
pub struct ManagedIdentityAccessTokenSourceImpl {
    client: reqwest::Client,
    endpoint: String,
    client_id: Option<String>,
    timeout: Duration,
}

impl ManagedIdentityAccessTokenSourceImpl {
    pub fn new(endpoint: String, client_id: Option<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            client_id,
            timeout,
        }
    }
}

#[async_trait]
impl AccessTokenSource for ManagedIdentityAccessTokenSourceImpl {
    async fn fetch_token(
        &self,
        scope: &CredentialScope,
    ) -> Result<AccessToken, DatabaseCredentialsDomainError> {
        let mut request = self
            .client
            .get(&self.endpoint)
            .header("Metadata", "true")
            .query(&[("api-version", IMDS_API_VERSION), ("resource", scope.resource())])
            .timeout(self.timeout);

        if let Some(client_id) = &self.client_id {
            request = request.query(&[("client_id", client_id.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DatabaseCredentialsDomainError::TokenRequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DatabaseCredentialsDomainError::TokenRequestFailed(format!(
                "token endpoint answered {status}"
            )));
        }

        let body: ManagedIdentityTokenResponse = response
            .json()
            .await
            .map_err(|e| DatabaseCredentialsDomainError::InvalidTokenResponse(e.to_string()))?;

        let expires_on: i64 = body.expires_on.trim().parse().map_err(|_| {
            DatabaseCredentialsDomainError::InvalidTokenResponse(format!(
                "expires_on is not a unix timestamp: {}",
                body.expires_on
            ))
        })?;
        let expires_at = DateTime::from_timestamp(expires_on, 0).ok_or_else(|| {
            DatabaseCredentialsDomainError::InvalidTokenResponse(format!(
                "expires_on is out of range: {expires_on}"
            ))
        })?;

        Ok(AccessToken {
            token: body.access_token,
            expires_at,
        })
    }
}
