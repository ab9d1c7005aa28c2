use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;

use crate::workspace_metadata::{
    application::services::workspace_metadata_cache_service_impl::WorkspaceMetadataCacheServiceImpl,
    domain::services::workspace_metadata_cache_service::WorkspaceMetadataCacheService,
    infrastructure::persistence::repositories::postgres::sqlx_workspace_metadata_repository_impl::SqlxWorkspaceMetadataRepositoryImpl,
    interfaces::rest::controllers::workspace_metadata_rest_controller::{
        WorkspaceMetadataRestControllerState, router,
    },
};

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub fn build_workspace_metadata_cache_service(
    admin_pool: PgPool,
) -> Arc<dyn WorkspaceMetadataCacheService> {
    let repository = Arc::new(SqlxWorkspaceMetadataRepositoryImpl::new(admin_pool));
    Arc::new(WorkspaceMetadataCacheServiceImpl::new(repository))
}

pub fn build_workspace_metadata_router(
    cache_service: Arc<dyn WorkspaceMetadataCacheService>,
) -> Router {
    router(WorkspaceMetadataRestControllerState { cache_service })
}
