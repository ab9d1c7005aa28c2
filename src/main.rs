use axum::Router;
use dotenvy::dotenv;
use sqlx::PgPool;
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use workspace_datasource_api::{
    config::app_config::AppConfig,
    database_credentials::build_database_credentials_provider,
    shared::infrastructure::telemetry::init_tracing,
    workspace_datasource::{
        build_workspace_datasource_factory, build_workspace_datasource_router,
        interfaces::rest::resources::{
            create_workspace_datasource_request_resource::CreateWorkspaceDatasourceRequestResource,
            workspace_datasource_error_response_resource::WorkspaceDatasourceErrorResponseResource,
            workspace_datasource_resource::WorkspaceDatasourceResource,
        },
    },
    workspace_metadata::{
        build_workspace_metadata_cache_service, build_workspace_metadata_router,
        interfaces::rest::resources::{
            metadata_version_resource::MetadataVersionResource,
            recompute_metadata_cache_request_resource::RecomputeMetadataCacheRequestResource,
            workspace_metadata_error_response_resource::WorkspaceMetadataErrorResponseResource,
        },
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        workspace_datasource_api::workspace_datasource::interfaces::rest::controllers::workspace_datasource_rest_controller::create_workspace_datasource,
        workspace_datasource_api::workspace_datasource::interfaces::rest::controllers::workspace_datasource_rest_controller::destroy_workspace_datasource,
        workspace_datasource_api::workspace_metadata::interfaces::rest::controllers::workspace_metadata_rest_controller::get_metadata_version,
        workspace_datasource_api::workspace_metadata::interfaces::rest::controllers::workspace_metadata_rest_controller::recompute_metadata_cache
    ),
    components(
        schemas(
            CreateWorkspaceDatasourceRequestResource,
            WorkspaceDatasourceResource,
            WorkspaceDatasourceErrorResponseResource,
            MetadataVersionResource,
            RecomputeMetadataCacheRequestResource,
            WorkspaceMetadataErrorResponseResource
        )
    ),
    tags(
        (name = "workspace-datasource", description = "Per-workspace connection pools keyed by metadata version"),
        (name = "workspace-metadata", description = "Workspace metadata version cache")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(config.log_format_json);

    let admin_pool = PgPool::connect(&config.pg_database_url)
        .await
        .expect("failed to connect to the core database");

    let credentials_provider = build_database_credentials_provider(&config);
    let metadata_cache_service = build_workspace_metadata_cache_service(admin_pool.clone());
    let datasource_factory = build_workspace_datasource_factory(
        &config,
        admin_pool,
        metadata_cache_service.clone(),
        credentials_provider,
    );

    let app = Router::new()
        .merge(build_workspace_datasource_router(datasource_factory.clone()))
        .merge(build_workspace_metadata_router(metadata_cache_service))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind server address");

    info!(port = config.port, "server listening");
    info!(url = %format!("http://localhost:{}/swagger-ui", config.port), "swagger ui available");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("failed to start axum server");

    match datasource_factory.shutdown().await {
        Ok(disposed) => info!(disposed, "workspace datasources closed"),
        Err(error) => error!(error = %error, "failed to close every workspace datasource"),
    }
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!(error = %error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
