use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use validator::Validate;

use crate::{
    shared::domain::model::value_objects::workspace_id::WorkspaceId,
    workspace_metadata::{
        domain::{
            model::{
                commands::recompute_metadata_cache_command::RecomputeMetadataCacheCommand,
                enums::workspace_metadata_domain_error::WorkspaceMetadataDomainError,
            },
            services::workspace_metadata_cache_service::WorkspaceMetadataCacheService,
        },
        interfaces::rest::resources::{
            metadata_version_resource::MetadataVersionResource,
            recompute_metadata_cache_request_resource::RecomputeMetadataCacheRequestResource,
            workspace_metadata_error_response_resource::WorkspaceMetadataErrorResponseResource,
        },
    },
};

type ErrorResponse = (StatusCode, Json<WorkspaceMetadataErrorResponseResource>);

#[derive(Clone)]
pub struct WorkspaceMetadataRestControllerState {
    pub cache_service: Arc<dyn WorkspaceMetadataCacheService>,
}

pub fn router(state: WorkspaceMetadataRestControllerState) -> Router {
    Router::new()
        .route(
            "/workspaces/:workspace_id/metadata/version",
            get(get_metadata_version),
        )
        .route(
            "/workspaces/:workspace_id/metadata/recompute",
            post(recompute_metadata_cache),
        )
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/workspaces/{workspace_id}/metadata/version",
    tag = "workspace-metadata",
    params(("workspace_id" = String, Path, description = "Workspace identifier")),
    responses(
        (status = 200, description = "Cached metadata version", body = MetadataVersionResource),
        (status = 400, description = "Invalid workspace id", body = WorkspaceMetadataErrorResponseResource)
    )
)]
pub async fn get_metadata_version(
    State(state): State<WorkspaceMetadataRestControllerState>,
    Path(workspace_id): Path<String>,
) -> Result<Json<MetadataVersionResource>, ErrorResponse> {
    let workspace_id = WorkspaceId::new(workspace_id)
        .map_err(WorkspaceMetadataDomainError::from)
        .map_err(map_domain_error)?;

    let version = state
        .cache_service
        .get_metadata_version(&workspace_id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(MetadataVersionResource {
        workspace_id: workspace_id.to_string(),
        metadata_version: version.map(|version| version.value()),
    }))
}

#[utoipa::path(
    post,
    path = "/workspaces/{workspace_id}/metadata/recompute",
    tag = "workspace-metadata",
    params(("workspace_id" = String, Path, description = "Workspace identifier")),
    request_body = RecomputeMetadataCacheRequestResource,
    responses(
        (status = 200, description = "Metadata cache recomputed", body = MetadataVersionResource),
        (status = 400, description = "Invalid request", body = WorkspaceMetadataErrorResponseResource),
        (status = 409, description = "Recompute already in progress", body = WorkspaceMetadataErrorResponseResource),
        (status = 500, description = "Infrastructure error", body = WorkspaceMetadataErrorResponseResource)
    )
)]
pub async fn recompute_metadata_cache(
    State(state): State<WorkspaceMetadataRestControllerState>,
    Path(workspace_id): Path<String>,
    Json(request): Json<RecomputeMetadataCacheRequestResource>,
) -> Result<Json<MetadataVersionResource>, ErrorResponse> {
    if let Err(validation_error) = request.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(WorkspaceMetadataErrorResponseResource {
                message: validation_error.to_string(),
            }),
        ));
    }

    let command = RecomputeMetadataCacheCommand::new(workspace_id, request.ignore_lock)
        .map_err(map_domain_error)?;
    let workspace_id = command.workspace_id().to_string();

    let version = state
        .cache_service
        .recompute_metadata_cache(command)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(MetadataVersionResource {
        workspace_id,
        metadata_version: version.map(|version| version.value()),
    }))
}

fn map_domain_error(error: WorkspaceMetadataDomainError) -> ErrorResponse {
    let status = match error {
        WorkspaceMetadataDomainError::InvalidWorkspaceId
        | WorkspaceMetadataDomainError::InvalidMetadataVersion => StatusCode::BAD_REQUEST,
        WorkspaceMetadataDomainError::RecomputeLocked(_) => StatusCode::CONFLICT,
        WorkspaceMetadataDomainError::InfrastructureError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(WorkspaceMetadataErrorResponseResource {
            message: error.to_string(),
        }),
    )
}
