use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    shared::domain::model::value_objects::{
        metadata_version::MetadataVersion, workspace_id::WorkspaceId,
    },
    workspace_datasource::domain::model::{
        entities::entity_mapping_set::EntityMappingSet, value_objects::schema_name::SchemaName,
    },
};

/// A live connection pool bound to one workspace schema at one metadata
/// version. Shared by every caller of that version; only the factory closes
/// it.
#[derive(Debug)]
pub struct WorkspaceDataSource {
    workspace_id: WorkspaceId,
    metadata_version: MetadataVersion,
    schema_name: SchemaName,
    entity_mappings: Arc<EntityMappingSet>,
    pool: PgPool,
    created_at: DateTime<Utc>,
}

impl WorkspaceDataSource {
    pub fn new(
        workspace_id: WorkspaceId,
        metadata_version: MetadataVersion,
        schema_name: SchemaName,
        entity_mappings: Arc<EntityMappingSet>,
        pool: PgPool,
    ) -> Self {
        Self {
            workspace_id,
            metadata_version,
            schema_name,
            entity_mappings,
            pool,
            created_at: Utc::now(),
        }
    }

    pub fn workspace_id(&self) -> &WorkspaceId {
        &self.workspace_id
    }

    pub fn metadata_version(&self) -> MetadataVersion {
        self.metadata_version
    }

    pub fn schema_name(&self) -> &SchemaName {
        &self.schema_name
    }

    pub fn entity_mappings(&self) -> &Arc<EntityMappingSet> {
        &self.entity_mappings
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
