use std::{sync::Mutex, time::Duration};

use async_trait::async_trait;
use chrono::Duration as ChronoDuration;
use workspace_datasource_api::database_credentials::{
    domain::model::{
        entities::access_token::AccessToken,
        enums::database_credentials_domain_error::DatabaseCredentialsDomainError,
        value_objects::credential_scope::CredentialScope,
    },
    infrastructure::identity::access_token_source::AccessTokenSource,
};

use super::fixtures::access_token;

struct FakeAccessTokenSourceState {
    fetch_calls: usize,
    token_lifetime: ChronoDuration,
    failing: bool,
}

pub struct FakeAccessTokenSource {
    state: Mutex<FakeAccessTokenSourceState>,
    fetch_delay: Duration,
}

impl FakeAccessTokenSource {
    pub fn new(token_lifetime: ChronoDuration, fetch_delay: Duration) -> Self {
        Self {
            state: Mutex::new(FakeAccessTokenSourceState {
                fetch_calls: 0,
                token_lifetime,
                failing: false,
            }),
            fetch_delay,
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.state.lock().expect("mutex poisoned").failing = failing;
    }

    pub fn fetch_calls(&self) -> usize {
        self.state.lock().expect("mutex poisoned").fetch_calls
    }
}

#[async_trait]
impl AccessTokenSource for FakeAccessTokenSource {
    async fn fetch_token(
        &self,
        _scope: &CredentialScope,
    ) -> Result<AccessToken, DatabaseCredentialsDomainError> {
        tokio::time::sleep(self.fetch_delay).await;

        let mut state = self.state.lock().expect("mutex poisoned");
        state.fetch_calls += 1;
        if state.failing {
            return Err(DatabaseCredentialsDomainError::TokenRequestFailed(
                "imds unreachable".to_string(),
            ));
        }

        let principal = format!("svc-{}@contoso.com", state.fetch_calls);
        Ok(access_token(&principal, state.token_lifetime))
    }
}
