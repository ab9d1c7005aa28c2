use std::fmt;

use crate::shared::domain::model::enums::shared_domain_error::SharedDomainError;

lazy_static::lazy_static! {
    static ref WORKSPACE_ID_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{0,63}$").expect("valid regex");
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct WorkspaceId(String);

impl WorkspaceId {
    pub fn new(value: String) -> Result<Self, SharedDomainError> {
        let trimmed = value.trim();
        if !WORKSPACE_ID_REGEX.is_match(trimmed) {
            return Err(SharedDomainError::InvalidWorkspaceId);
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
