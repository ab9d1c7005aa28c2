use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    shared::domain::model::value_objects::workspace_id::WorkspaceId,
    workspace_datasource::{
        domain::model::{
            entities::data_source_metadata::DataSourceMetadata,
            enums::workspace_datasource_domain_error::WorkspaceDatasourceDomainError,
            value_objects::schema_name::SchemaName,
        },
        infrastructure::persistence::repositories::data_source_metadata_repository::DataSourceMetadataRepository,
    },
};

type DataSourceRow = (
    Uuid,
    Option<String>,
    Option<String>,
    Option<i32>,
    Option<String>,
    Option<String>,
    String,
    DateTime<Utc>,
);

pub struct SqlxDataSourceMetadataRepositoryImpl {
    pool: PgPool,
}

impl SqlxDataSourceMetadataRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DataSourceMetadataRepository for SqlxDataSourceMetadataRepositoryImpl {
    async fn find_last_by_workspace_id(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Option<DataSourceMetadata>, WorkspaceDatasourceDomainError> {
        let statement = r#"
            SELECT id, url, host, port, username, database, schema, "createdAt"
            FROM metadata."dataSource"
            WHERE "workspaceId"::text = $1
            ORDER BY "createdAt" DESC
            LIMIT 1
        "#;

        let row = sqlx::query_as::<_, DataSourceRow>(statement)
            .bind(workspace_id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| WorkspaceDatasourceDomainError::InfrastructureError(e.to_string()))?;

        let Some((id, url, host, port, username, database, schema, created_at)) = row else {
            return Ok(None);
        };

        let port = port
            .map(u16::try_from)
            .transpose()
            .map_err(|e| WorkspaceDatasourceDomainError::InfrastructureError(e.to_string()))?;

        Ok(Some(DataSourceMetadata {
            id,
            workspace_id: workspace_id.clone(),
            url: url.filter(|value| !value.trim().is_empty()),
            host: host.filter(|value| !value.trim().is_empty()),
            port,
            username: username.filter(|value| !value.trim().is_empty()),
            database: database.filter(|value| !value.trim().is_empty()),
            schema: SchemaName::new(schema)?,
            created_at,
        }))
    }
}
