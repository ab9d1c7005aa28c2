use std::fmt;

use crate::database_credentials::domain::model::enums::database_credentials_domain_error::DatabaseCredentialsDomainError;

pub const POSTGRES_ENTRA_SCOPE: &str = "https://ossrdbms-aad.database.windows.net/.default";

const DEFAULT_SUFFIX: &str = "/.default";

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct CredentialScope(String);

impl CredentialScope {
    pub fn new(value: String) -> Result<Self, DatabaseCredentialsDomainError> {
        let trimmed = value.trim();
        if !trimmed.starts_with("https://") || trimmed.len() <= "https://".len() {
            return Err(DatabaseCredentialsDomainError::InvalidCredentialScope);
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn postgres() -> Self {
        Self(POSTGRES_ENTRA_SCOPE.to_string())
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    /// Resource identifier expected by token endpoints that predate scopes.
    pub fn resource(&self) -> &str {
        self.0.strip_suffix(DEFAULT_SUFFIX).unwrap_or(&self.0)
    }
}

impl fmt::Display for CredentialScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
