use std::fmt;

use crate::shared::domain::model::enums::shared_domain_error::SharedDomainError;

/// Version stamp over a workspace's metadata shape. Zero and negative values
/// are never published.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct MetadataVersion(i64);

impl MetadataVersion {
    pub fn new(value: i64) -> Result<Self, SharedDomainError> {
        if value <= 0 {
            return Err(SharedDomainError::InvalidMetadataVersion);
        }

        Ok(Self(value))
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MetadataVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
