use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::{
    sync::{Mutex, watch},
    task::JoinHandle,
};
use tracing::{info, warn};

use crate::database_credentials::{
    domain::{
        model::{
            entities::database_credentials::DatabaseCredentials,
            enums::database_credentials_domain_error::DatabaseCredentialsDomainError,
            value_objects::credential_scope::CredentialScope,
        },
        services::database_credentials_provider::DatabaseCredentialsProvider,
    },
    infrastructure::identity::access_token_source::AccessTokenSource,
};

#[derive(Clone, Copy, Debug)]
pub struct CredentialRefreshPolicy {
    /// Upper bound of the random lead taken before expiry, so identities
    /// shared by many workspaces do not refresh in lockstep.
    pub max_jitter: Duration,
    /// Floor for any scheduled wait; also the retry delay after a failure and
    /// the validity margin for cached credentials.
    pub min_delay: Duration,
}

pub struct RefreshingDatabaseCredentialsProviderImpl {
    token_source: Arc<dyn AccessTokenSource>,
    scope: CredentialScope,
    policy: CredentialRefreshPolicy,
    current: watch::Sender<Option<DatabaseCredentials>>,
    refresh_lock: Mutex<()>,
}

impl RefreshingDatabaseCredentialsProviderImpl {
    pub fn new(
        token_source: Arc<dyn AccessTokenSource>,
        scope: CredentialScope,
        policy: CredentialRefreshPolicy,
    ) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            token_source,
            scope,
            policy,
            current,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Starts the background refresh loop. The first refresh happens
    /// immediately; later ones at `expiry - jitter`.
    pub fn spawn_refresh_loop(self: &Arc<Self>) -> JoinHandle<()> {
        let provider = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                let delay = match provider.refresh().await {
                    Ok(credentials) => match credentials.expires_at() {
                        Some(expires_at) => refresh_delay(
                            expires_at,
                            Utc::now(),
                            sample_jitter(provider.policy.max_jitter),
                            provider.policy.min_delay,
                        ),
                        None => break,
                    },
                    Err(error) => {
                        warn!(
                            scope = %provider.scope,
                            error = %error,
                            retry_in_secs = provider.policy.min_delay.as_secs(),
                            "database credential refresh failed"
                        );
                        provider.policy.min_delay
                    }
                };

                tokio::time::sleep(delay).await;
            }
        })
    }

    /// Fetches a new token regardless of the cached one and publishes it.
    pub async fn refresh(&self) -> Result<DatabaseCredentials, DatabaseCredentialsDomainError> {
        let _guard = self.refresh_lock.lock().await;
        self.fetch_and_publish().await
    }

    fn cached_valid(&self, now: DateTime<Utc>) -> Option<DatabaseCredentials> {
        let margin = chrono::Duration::from_std(self.policy.min_delay).unwrap_or(chrono::Duration::zero());
        self.current
            .borrow()
            .as_ref()
            .filter(|credentials| credentials.is_valid_at(now, margin))
            .cloned()
    }

    async fn fetch_and_publish(&self) -> Result<DatabaseCredentials, DatabaseCredentialsDomainError> {
        let token = self.token_source.fetch_token(&self.scope).await?;
        let credentials = DatabaseCredentials::from_access_token(&token);

        info!(
            scope = %self.scope,
            principal = credentials.principal().unwrap_or("<unknown>"),
            fingerprint = %credentials.fingerprint(),
            expires_at = %token.expires_at,
            "database credentials refreshed"
        );

        self.current.send_replace(Some(credentials.clone()));
        Ok(credentials)
    }
}

#[async_trait]
impl DatabaseCredentialsProvider for RefreshingDatabaseCredentialsProviderImpl {
    async fn get_credentials(
        &self,
        scope: &CredentialScope,
    ) -> Result<DatabaseCredentials, DatabaseCredentialsDomainError> {
        if scope != &self.scope {
            return Err(DatabaseCredentialsDomainError::UnsupportedCredentialScope {
                requested: scope.value().to_string(),
                served: self.scope.value().to_string(),
            });
        }

        if let Some(credentials) = self.cached_valid(Utc::now()) {
            return Ok(credentials);
        }

        let _guard = self.refresh_lock.lock().await;
        if let Some(credentials) = self.cached_valid(Utc::now()) {
            return Ok(credentials);
        }

        self.fetch_and_publish().await
    }

    fn subscribe(&self) -> watch::Receiver<Option<DatabaseCredentials>> {
        self.current.subscribe()
    }
}

/// Wait before the next proactive refresh: time left until `expires_at`
/// minus `jitter`, never below `min_delay`.
pub fn refresh_delay(
    expires_at: DateTime<Utc>,
    now: DateTime<Utc>,
    jitter: Duration,
    min_delay: Duration,
) -> Duration {
    let until_expiry = (expires_at - now).to_std().unwrap_or(Duration::ZERO);
    until_expiry.saturating_sub(jitter).max(min_delay)
}

pub fn sample_jitter(max_jitter: Duration) -> Duration {
    let max_millis = u64::try_from(max_jitter.as_millis()).unwrap_or(u64::MAX);
    if max_millis == 0 {
        return Duration::ZERO;
    }

    Duration::from_millis(rand::thread_rng().gen_range(0..=max_millis))
}
