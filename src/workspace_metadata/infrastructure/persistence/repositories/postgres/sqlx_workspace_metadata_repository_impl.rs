use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    shared::domain::model::value_objects::workspace_id::WorkspaceId,
    workspace_metadata::{
        domain::model::{
            entities::object_metadata::{FieldMetadata, ObjectMetadata},
            enums::workspace_metadata_domain_error::WorkspaceMetadataDomainError,
        },
        infrastructure::persistence::repositories::workspace_metadata_repository::WorkspaceMetadataRepository,
    },
};

type ObjectMetadataRow = (
    Uuid,
    String,
    String,
    bool,
    Option<Uuid>,
    Option<String>,
    Option<String>,
    Option<bool>,
    Option<bool>,
);

pub struct SqlxWorkspaceMetadataRepositoryImpl {
    pool: PgPool,
}

impl SqlxWorkspaceMetadataRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkspaceMetadataRepository for SqlxWorkspaceMetadataRepositoryImpl {
    async fn find_metadata_version(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Option<i64>, WorkspaceMetadataDomainError> {
        let statement = r#"
            SELECT "metadataVersion"::bigint
            FROM core.workspace
            WHERE id::text = $1
        "#;

        let row = sqlx::query_as::<_, (Option<i64>,)>(statement)
            .bind(workspace_id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| WorkspaceMetadataDomainError::InfrastructureError(e.to_string()))?;

        Ok(row.and_then(|(version,)| version))
    }

    async fn find_object_metadata(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Vec<ObjectMetadata>, WorkspaceMetadataDomainError> {
        let statement = r#"
            SELECT
                o.id,
                o."nameSingular",
                o."namePlural",
                o."isCustom",
                f.id,
                f.name,
                f.type::text,
                f."isNullable",
                f."isCustom"
            FROM metadata."objectMetadata" o
            LEFT JOIN metadata."fieldMetadata" f
                ON f."objectMetadataId" = o.id
               AND f."isActive" = TRUE
            WHERE o."workspaceId"::text = $1
              AND o."isActive" = TRUE
            ORDER BY o."nameSingular", f.name
        "#;

        let rows = sqlx::query_as::<_, ObjectMetadataRow>(statement)
            .bind(workspace_id.value())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| WorkspaceMetadataDomainError::InfrastructureError(e.to_string()))?;

        let mut objects: Vec<ObjectMetadata> = Vec::new();
        for (
            object_id,
            name_singular,
            name_plural,
            object_is_custom,
            field_id,
            field_name,
            field_type,
            field_is_nullable,
            field_is_custom,
        ) in rows
        {
            // Rows arrive grouped by object, so only the last one can match.
            if objects.last().is_none_or(|object| object.id != object_id) {
                objects.push(ObjectMetadata {
                    id: object_id,
                    name_singular,
                    name_plural,
                    is_custom: object_is_custom,
                    fields: Vec::new(),
                });
            }

            let (Some(field_id), Some(field_name), Some(object)) =
                (field_id, field_name, objects.last_mut())
            else {
                continue;
            };

            object.fields.push(FieldMetadata {
                id: field_id,
                name: field_name,
                field_type: field_type.unwrap_or_default(),
                is_nullable: field_is_nullable.unwrap_or(true),
                is_custom: field_is_custom.unwrap_or(false),
            });
        }

        Ok(objects)
    }
}
