use thiserror::Error;
use tokio::task::JoinError;

use crate::shared::{
    domain::model::enums::shared_domain_error::SharedDomainError,
    infrastructure::cache::versioned_resource_cache::DisposalError,
};

#[derive(Clone, Debug, Error)]
pub enum WorkspaceDatasourceDomainError {
    #[error("metadata version not found for workspace {workspace_id}")]
    MetadataVersionNotFound { workspace_id: String },

    #[error(
        "metadata version mismatch for workspace {workspace_id}: current {current}, expected {expected}"
    )]
    MetadataVersionMismatch {
        workspace_id: String,
        current: i64,
        expected: i64,
    },

    #[error("failed to build datasource for workspace {workspace_id} at version {version}: {reason}")]
    BuildFailure {
        workspace_id: String,
        version: i64,
        reason: String,
    },

    #[error("failed to dispose datasource for workspace {workspace_id} at version {version}: {reason}")]
    DisposeFailure {
        workspace_id: String,
        version: i64,
        reason: String,
    },

    #[error("datasource was already released")]
    DatasourceAlreadyReleased,

    #[error("no data source registered for workspace {workspace_id}")]
    WorkspaceSchemaNotFound { workspace_id: String },

    #[error("object metadata collection not found for workspace {workspace_id} at version {version}")]
    MetadataCollectionNotFound { workspace_id: String, version: i64 },

    #[error("metadata recompute already in progress for workspace {workspace_id}")]
    MetadataRecomputeLocked { workspace_id: String },

    #[error("database credentials unavailable: {0}")]
    CredentialsUnavailable(String),

    #[error("workspace id is invalid")]
    InvalidWorkspaceId,

    #[error("metadata version is invalid")]
    InvalidMetadataVersion,

    #[error("schema name is invalid")]
    InvalidSchemaName,

    #[error("infrastructure error: {0}")]
    InfrastructureError(String),
}

impl WorkspaceDatasourceDomainError {
    /// Keeps errors callers branch on and folds everything else into
    /// `BuildFailure` with the workspace and version attached.
    pub fn into_build_failure(self, workspace_id: &str, version: i64) -> Self {
        match self {
            Self::BuildFailure { .. }
            | Self::WorkspaceSchemaNotFound { .. }
            | Self::MetadataCollectionNotFound { .. }
            | Self::CredentialsUnavailable(_)
            | Self::InvalidSchemaName => self,
            other => Self::BuildFailure {
                workspace_id: workspace_id.to_string(),
                version,
                reason: other.to_string(),
            },
        }
    }
}

impl DisposalError for WorkspaceDatasourceDomainError {
    fn is_already_released(&self) -> bool {
        matches!(self, Self::DatasourceAlreadyReleased)
    }
}

impl From<SharedDomainError> for WorkspaceDatasourceDomainError {
    fn from(error: SharedDomainError) -> Self {
        match error {
            SharedDomainError::InvalidWorkspaceId => Self::InvalidWorkspaceId,
            SharedDomainError::InvalidMetadataVersion => Self::InvalidMetadataVersion,
        }
    }
}

impl From<JoinError> for WorkspaceDatasourceDomainError {
    fn from(error: JoinError) -> Self {
        WorkspaceDatasourceDomainError::InfrastructureError(format!("build task failed: {error}"))
    }
}
