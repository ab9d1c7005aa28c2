use std::collections::BTreeMap;

use uuid::Uuid;

use crate::{
    shared::domain::model::value_objects::{
        metadata_version::MetadataVersion, workspace_id::WorkspaceId,
    },
    workspace_datasource::interfaces::acl::workspace_metadata_facade::ObjectMetadataSnapshot,
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnMapping {
    pub field_name: String,
    pub column_name: String,
    pub field_type: String,
    pub is_nullable: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EntityMapping {
    pub object_metadata_id: Uuid,
    pub entity_name: String,
    pub table_name: String,
    pub columns: Vec<ColumnMapping>,
}

impl EntityMapping {
    pub fn from_object_metadata(object: &ObjectMetadataSnapshot) -> Self {
        let table_name = if object.is_custom {
            format!("_{}", object.name_singular)
        } else {
            object.name_singular.clone()
        };

        Self {
            object_metadata_id: object.id,
            entity_name: object.name_singular.clone(),
            table_name,
            columns: object
                .fields
                .iter()
                .map(|field| ColumnMapping {
                    field_name: field.name.clone(),
                    column_name: field.name.clone(),
                    field_type: field.field_type.clone(),
                    is_nullable: field.is_nullable,
                })
                .collect(),
        }
    }
}

/// Entity mappings of one workspace at one metadata version, keyed by entity
/// name.
#[derive(Clone, Debug)]
pub struct EntityMappingSet {
    workspace_id: WorkspaceId,
    metadata_version: MetadataVersion,
    entities: BTreeMap<String, EntityMapping>,
}

impl EntityMappingSet {
    pub fn from_object_metadata(
        workspace_id: WorkspaceId,
        metadata_version: MetadataVersion,
        objects: &[ObjectMetadataSnapshot],
    ) -> Self {
        let entities = objects
            .iter()
            .map(EntityMapping::from_object_metadata)
            .map(|mapping| (mapping.entity_name.clone(), mapping))
            .collect();

        Self {
            workspace_id,
            metadata_version,
            entities,
        }
    }

    pub fn workspace_id(&self) -> &WorkspaceId {
        &self.workspace_id
    }

    pub fn metadata_version(&self) -> MetadataVersion {
        self.metadata_version
    }

    pub fn get(&self, entity_name: &str) -> Option<&EntityMapping> {
        self.entities.get(entity_name)
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityMapping> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
