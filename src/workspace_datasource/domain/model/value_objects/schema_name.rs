use std::fmt::{Display, Formatter};

use lazy_static::lazy_static;
use regex::Regex;

use crate::workspace_datasource::domain::model::enums::workspace_datasource_domain_error::WorkspaceDatasourceDomainError;

lazy_static! {
    static ref SCHEMA_NAME_REGEX: Regex =
        Regex::new(r"^[a-z_][a-z0-9_]{0,62}$").expect("valid schema name regex");
}

/// Postgres schema a workspace's tables live in; applied as `search_path`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SchemaName(String);

impl SchemaName {
    pub fn new(value: String) -> Result<Self, WorkspaceDatasourceDomainError> {
        let normalized = value.trim().to_string();
        if !SCHEMA_NAME_REGEX.is_match(&normalized) {
            return Err(WorkspaceDatasourceDomainError::InvalidSchemaName);
        }

        Ok(Self(normalized))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl Display for SchemaName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
