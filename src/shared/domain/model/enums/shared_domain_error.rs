use thiserror::Error;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SharedDomainError {
    #[error("workspace id is invalid")]
    InvalidWorkspaceId,

    #[error("metadata version must be a positive integer")]
    InvalidMetadataVersion,
}
