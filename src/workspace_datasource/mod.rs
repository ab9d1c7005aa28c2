use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;

use crate::{
    config::app_config::AppConfig,
    database_credentials::domain::services::database_credentials_provider::DatabaseCredentialsProvider,
    workspace_datasource::{
        application::{
            acl::workspace_metadata_facade_real_impl::WorkspaceMetadataFacadeRealImpl,
            factories::workspace_datasource_factory_impl::WorkspaceDatasourceFactoryImpl,
        },
        domain::services::workspace_datasource_factory::WorkspaceDatasourceFactory,
        infrastructure::persistence::repositories::postgres::{
            sqlx_data_source_metadata_repository_impl::SqlxDataSourceMetadataRepositoryImpl,
            sqlx_workspace_connection_builder_repository_impl::SqlxWorkspaceConnectionBuilderRepositoryImpl,
        },
        interfaces::rest::controllers::workspace_datasource_rest_controller::{
            WorkspaceDatasourceRestControllerState, router,
        },
    },
    workspace_metadata::domain::services::workspace_metadata_cache_service::WorkspaceMetadataCacheService,
};

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub fn build_workspace_datasource_factory(
    config: &AppConfig,
    admin_pool: PgPool,
    metadata_cache_service: Arc<dyn WorkspaceMetadataCacheService>,
    credentials_provider: Option<Arc<dyn DatabaseCredentialsProvider>>,
) -> Arc<dyn WorkspaceDatasourceFactory> {
    let metadata_facade = Arc::new(WorkspaceMetadataFacadeRealImpl::new(metadata_cache_service));
    let data_source_metadata_repository =
        Arc::new(SqlxDataSourceMetadataRepositoryImpl::new(admin_pool));
    let connection_builder = Arc::new(SqlxWorkspaceConnectionBuilderRepositoryImpl::new(
        config.clone(),
        credentials_provider,
    ));

    Arc::new(WorkspaceDatasourceFactoryImpl::new(
        metadata_facade,
        data_source_metadata_repository,
        connection_builder,
        config.datasource_build_timeout(),
    ))
}

pub fn build_workspace_datasource_router(factory: Arc<dyn WorkspaceDatasourceFactory>) -> Router {
    router(WorkspaceDatasourceRestControllerState { factory })
}
