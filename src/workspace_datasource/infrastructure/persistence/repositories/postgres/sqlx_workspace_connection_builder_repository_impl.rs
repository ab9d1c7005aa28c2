use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{
    ConnectOptions, PgPool,
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info};

use crate::{
    config::app_config::AppConfig,
    database_credentials::domain::{
        model::{
            entities::database_credentials::DatabaseCredentials,
            value_objects::credential_scope::CredentialScope,
        },
        services::database_credentials_provider::DatabaseCredentialsProvider,
    },
    shared::domain::model::value_objects::workspace_id::WorkspaceId,
    workspace_datasource::{
        domain::model::{
            entities::{
                data_source_metadata::DataSourceMetadata,
                workspace_data_source::WorkspaceDataSource,
            },
            enums::workspace_datasource_domain_error::WorkspaceDatasourceDomainError,
        },
        infrastructure::persistence::repositories::workspace_connection_builder_repository::{
            WorkspaceConnectionBuilderRepository, WorkspaceConnectionRequest,
        },
    },
};

const APPLICATION_NAME: &str = "workspace-datasource-api";

pub struct SqlxWorkspaceConnectionBuilderRepositoryImpl {
    config: AppConfig,
    credentials_provider: Option<Arc<dyn DatabaseCredentialsProvider>>,
}

impl SqlxWorkspaceConnectionBuilderRepositoryImpl {
    pub fn new(
        config: AppConfig,
        credentials_provider: Option<Arc<dyn DatabaseCredentialsProvider>>,
    ) -> Self {
        Self {
            config,
            credentials_provider,
        }
    }

    async fn current_credentials(
        &self,
    ) -> Result<Option<DatabaseCredentials>, WorkspaceDatasourceDomainError> {
        let Some(provider) = &self.credentials_provider else {
            return Ok(None);
        };

        provider
            .get_credentials(&CredentialScope::postgres())
            .await
            .map(Some)
            .map_err(|e| WorkspaceDatasourceDomainError::CredentialsUnavailable(e.to_string()))
    }

    /// Token credentials connect with host, port and database fields under
    /// TLS; without them the data source URL is used as is.
    pub fn connect_options(
        &self,
        data_source: &DataSourceMetadata,
        credentials: Option<&DatabaseCredentials>,
    ) -> Result<PgConnectOptions, WorkspaceDatasourceDomainError> {
        let options = match credentials {
            Some(credentials) => {
                let username = data_source
                    .username
                    .as_deref()
                    .or(credentials.principal())
                    .ok_or_else(|| {
                        WorkspaceDatasourceDomainError::CredentialsUnavailable(
                            "no username on the data source or in the access token".to_string(),
                        )
                    })?;

                PgConnectOptions::new()
                    .host(data_source.host.as_deref().unwrap_or(&self.config.pg_database_host))
                    .port(data_source.port.unwrap_or(self.config.pg_database_port))
                    .database(
                        data_source
                            .database
                            .as_deref()
                            .unwrap_or(&self.config.pg_database_name),
                    )
                    .username(username)
                    .password(credentials.secret())
                    .ssl_mode(PgSslMode::Require)
            }
            None => {
                let url = data_source
                    .url
                    .as_deref()
                    .unwrap_or(&self.config.pg_database_url);
                let options = url.parse::<PgConnectOptions>().map_err(|e| {
                    WorkspaceDatasourceDomainError::InfrastructureError(e.to_string())
                })?;

                // Require encrypts without verifying the certificate chain.
                if self.config.pg_ssl_allow_self_signed {
                    options.ssl_mode(PgSslMode::Require)
                } else {
                    options
                }
            }
        };

        let options = options
            .application_name(APPLICATION_NAME)
            .options([("search_path", data_source.schema.value())]);

        Ok(if self.config.debug_mode {
            options
        } else {
            options.disable_statement_logging()
        })
    }
}

#[async_trait]
impl WorkspaceConnectionBuilderRepository for SqlxWorkspaceConnectionBuilderRepositoryImpl {
    async fn build(
        &self,
        request: WorkspaceConnectionRequest,
    ) -> Result<WorkspaceDataSource, WorkspaceDatasourceDomainError> {
        let credentials = self.current_credentials().await?;
        let connect_options = self.connect_options(&request.data_source, credentials.as_ref())?;

        // connect_with opens the first connection before returning.
        let pool = PgPoolOptions::new()
            .max_connections(self.config.datasource_max_connections)
            .acquire_timeout(self.config.datasource_acquire_timeout())
            .connect_with(connect_options.clone())
            .await
            .map_err(|e| WorkspaceDatasourceDomainError::BuildFailure {
                workspace_id: request.workspace_id.to_string(),
                version: request.metadata_version.value(),
                reason: e.to_string(),
            })?;

        if let Some(provider) = &self.credentials_provider {
            spawn_credential_rotation(
                pool.clone(),
                connect_options,
                request.data_source.username.clone(),
                provider.subscribe(),
                request.workspace_id.clone(),
            );
        }

        info!(
            workspace_id = %request.workspace_id,
            metadata_version = %request.metadata_version,
            schema = %request.data_source.schema,
            entity_count = request.entity_mappings.len(),
            "workspace pool opened"
        );

        Ok(WorkspaceDataSource::new(
            request.workspace_id,
            request.metadata_version,
            request.data_source.schema,
            request.entity_mappings,
            pool,
        ))
    }

    async fn dispose(
        &self,
        data_source: Arc<WorkspaceDataSource>,
    ) -> Result<(), WorkspaceDatasourceDomainError> {
        if data_source.pool().is_closed() {
            return Err(WorkspaceDatasourceDomainError::DatasourceAlreadyReleased);
        }

        data_source.pool().close().await;

        info!(
            workspace_id = %data_source.workspace_id(),
            metadata_version = %data_source.metadata_version(),
            "workspace pool closed"
        );
        Ok(())
    }
}

/// Options an open pool switches to when credentials rotate. A username on
/// the data source row wins over the token principal.
pub fn rotated_connect_options(
    connect_options: &PgConnectOptions,
    data_source_username: Option<&str>,
    credentials: &DatabaseCredentials,
) -> PgConnectOptions {
    let options = connect_options.clone().password(credentials.secret());
    match data_source_username.or(credentials.principal()) {
        Some(username) => options.username(username),
        None => options,
    }
}

/// Swaps the credentials of an open pool whenever the provider publishes new
/// ones. Existing connections stay; new ones use the new token. Ends when the
/// pool closes or the provider goes away.
pub fn spawn_credential_rotation(
    pool: PgPool,
    connect_options: PgConnectOptions,
    data_source_username: Option<String>,
    mut credentials: watch::Receiver<Option<DatabaseCredentials>>,
    workspace_id: WorkspaceId,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = pool.close_event() => break,
                changed = credentials.changed() => {
                    if changed.is_err() {
                        break;
                    }

                    let Some(next) = credentials.borrow_and_update().clone() else {
                        continue;
                    };

                    pool.set_connect_options(rotated_connect_options(
                        &connect_options,
                        data_source_username.as_deref(),
                        &next,
                    ));
                    debug!(
                        workspace_id = %workspace_id,
                        fingerprint = %next.fingerprint(),
                        "workspace pool credentials rotated"
                    );
                }
            }
        }
    })
}
