use thiserror::Error;

use crate::shared::domain::model::enums::shared_domain_error::SharedDomainError;

#[derive(Clone, Debug, Error)]
pub enum WorkspaceMetadataDomainError {
    #[error("workspace id is invalid")]
    InvalidWorkspaceId,

    #[error("metadata version is invalid")]
    InvalidMetadataVersion,

    #[error("metadata cache recompute already in progress for workspace {0}")]
    RecomputeLocked(String),

    #[error("infrastructure error: {0}")]
    InfrastructureError(String),
}

impl From<SharedDomainError> for WorkspaceMetadataDomainError {
    fn from(error: SharedDomainError) -> Self {
        match error {
            SharedDomainError::InvalidWorkspaceId => Self::InvalidWorkspaceId,
            SharedDomainError::InvalidMetadataVersion => Self::InvalidMetadataVersion,
        }
    }
}
