use std::collections::HashMap;

use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct FieldMetadata {
    pub id: Uuid,
    pub name: String,
    pub field_type: String,
    pub is_nullable: bool,
    pub is_custom: bool,
}

#[derive(Clone, Debug)]
pub struct ObjectMetadata {
    pub id: Uuid,
    pub name_singular: String,
    pub name_plural: String,
    pub is_custom: bool,
    pub fields: Vec<FieldMetadata>,
}

/// Object metadata of one workspace at one metadata version, indexed the two
/// ways lookups need.
#[derive(Clone, Debug, Default)]
pub struct ObjectMetadataMaps {
    by_id: HashMap<Uuid, ObjectMetadata>,
    id_by_name_singular: HashMap<String, Uuid>,
}

impl ObjectMetadataMaps {
    pub fn new(objects: Vec<ObjectMetadata>) -> Self {
        let mut maps = Self::default();
        for object in objects {
            maps.id_by_name_singular
                .insert(object.name_singular.clone(), object.id);
            maps.by_id.insert(object.id, object);
        }
        maps
    }

    pub fn get_by_id(&self, id: &Uuid) -> Option<&ObjectMetadata> {
        self.by_id.get(id)
    }

    pub fn get_by_name_singular(&self, name_singular: &str) -> Option<&ObjectMetadata> {
        self.id_by_name_singular
            .get(name_singular)
            .and_then(|id| self.by_id.get(id))
    }

    pub fn objects(&self) -> impl Iterator<Item = &ObjectMetadata> {
        self.by_id.values()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
