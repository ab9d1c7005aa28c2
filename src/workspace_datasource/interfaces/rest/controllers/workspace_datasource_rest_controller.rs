use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};
use validator::Validate;

use crate::workspace_datasource::{
    domain::{
        model::{
            commands::{
                create_workspace_datasource_command::CreateWorkspaceDatasourceCommand,
                destroy_workspace_datasource_command::DestroyWorkspaceDatasourceCommand,
            },
            enums::workspace_datasource_domain_error::WorkspaceDatasourceDomainError,
        },
        services::workspace_datasource_factory::WorkspaceDatasourceFactory,
    },
    interfaces::rest::resources::{
        create_workspace_datasource_request_resource::CreateWorkspaceDatasourceRequestResource,
        workspace_datasource_error_response_resource::WorkspaceDatasourceErrorResponseResource,
        workspace_datasource_resource::WorkspaceDatasourceResource,
    },
};

type ErrorResponse = (StatusCode, Json<WorkspaceDatasourceErrorResponseResource>);

#[derive(Clone)]
pub struct WorkspaceDatasourceRestControllerState {
    pub factory: Arc<dyn WorkspaceDatasourceFactory>,
}

pub fn router(state: WorkspaceDatasourceRestControllerState) -> Router {
    Router::new()
        .route(
            "/workspaces/:workspace_id/datasource",
            post(create_workspace_datasource).delete(destroy_workspace_datasource),
        )
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/workspaces/{workspace_id}/datasource",
    tag = "workspace-datasource",
    params(("workspace_id" = String, Path, description = "Workspace identifier")),
    request_body = CreateWorkspaceDatasourceRequestResource,
    responses(
        (status = 200, description = "Datasource ready", body = WorkspaceDatasourceResource),
        (status = 400, description = "Invalid request", body = WorkspaceDatasourceErrorResponseResource),
        (status = 404, description = "Metadata version or data source not found", body = WorkspaceDatasourceErrorResponseResource),
        (status = 409, description = "Metadata version mismatch or recompute in progress", body = WorkspaceDatasourceErrorResponseResource),
        (status = 503, description = "Datasource could not be built", body = WorkspaceDatasourceErrorResponseResource)
    )
)]
pub async fn create_workspace_datasource(
    State(state): State<WorkspaceDatasourceRestControllerState>,
    Path(workspace_id): Path<String>,
    Json(request): Json<CreateWorkspaceDatasourceRequestResource>,
) -> Result<Json<WorkspaceDatasourceResource>, ErrorResponse> {
    if let Err(validation_error) = request.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(WorkspaceDatasourceErrorResponseResource {
                message: validation_error.to_string(),
            }),
        ));
    }

    let command = CreateWorkspaceDatasourceCommand::new(
        workspace_id,
        request.expected_metadata_version,
        request.fail_on_metadata_cache_miss.unwrap_or(true),
    )
    .map_err(map_domain_error)?;

    let data_source = state
        .factory
        .create(command)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(WorkspaceDatasourceResource::from(data_source.as_ref())))
}

#[utoipa::path(
    delete,
    path = "/workspaces/{workspace_id}/datasource",
    tag = "workspace-datasource",
    params(("workspace_id" = String, Path, description = "Workspace identifier")),
    responses(
        (status = 204, description = "Datasource destroyed or nothing cached"),
        (status = 400, description = "Invalid workspace id", body = WorkspaceDatasourceErrorResponseResource),
        (status = 500, description = "Datasource disposal failed", body = WorkspaceDatasourceErrorResponseResource)
    )
)]
pub async fn destroy_workspace_datasource(
    State(state): State<WorkspaceDatasourceRestControllerState>,
    Path(workspace_id): Path<String>,
) -> Result<StatusCode, ErrorResponse> {
    let command = DestroyWorkspaceDatasourceCommand::new(workspace_id).map_err(map_domain_error)?;

    state
        .factory
        .destroy(command)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

fn map_domain_error(error: WorkspaceDatasourceDomainError) -> ErrorResponse {
    let status = match error {
        WorkspaceDatasourceDomainError::InvalidWorkspaceId
        | WorkspaceDatasourceDomainError::InvalidMetadataVersion
        | WorkspaceDatasourceDomainError::InvalidSchemaName => StatusCode::BAD_REQUEST,
        WorkspaceDatasourceDomainError::MetadataVersionNotFound { .. }
        | WorkspaceDatasourceDomainError::WorkspaceSchemaNotFound { .. }
        | WorkspaceDatasourceDomainError::MetadataCollectionNotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        WorkspaceDatasourceDomainError::MetadataVersionMismatch { .. }
        | WorkspaceDatasourceDomainError::MetadataRecomputeLocked { .. } => StatusCode::CONFLICT,
        WorkspaceDatasourceDomainError::BuildFailure { .. }
        | WorkspaceDatasourceDomainError::CredentialsUnavailable(_) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        WorkspaceDatasourceDomainError::DisposeFailure { .. }
        | WorkspaceDatasourceDomainError::DatasourceAlreadyReleased
        | WorkspaceDatasourceDomainError::InfrastructureError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (
        status,
        Json(WorkspaceDatasourceErrorResponseResource {
            message: error.to_string(),
        }),
    )
}
