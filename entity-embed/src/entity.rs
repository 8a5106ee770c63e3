//! Entities that can be embedded
//!
//! The host system owns the real entity model. This module only keeps the
//! handful of properties the displays need (type, stable uuid, label and, for
//! files, the stored file data) plus the [`EntityRepository`] seam used to
//! resolve a reference found in markup back into a live entity.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::EmbedError;

/// Stored file attached to a `file` entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileData {
    /// Stream wrapper URI, e.g. `public://image-test.png`
    pub uri: String,
    pub filename: String,
    /// MIME type, e.g. `image/png`
    pub mime: String,
    #[serde(default)]
    pub size: u64,
}

/// An entity instance as seen by the embed displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_type: String,
    pub id: u64,
    pub uuid: Uuid,
    #[serde(default)]
    pub bundle: String,
    pub label: String,
    /// Canonical path for non-file entities. Defaults to `/<type>/<id>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileData>,
}

/// The `(type, subtype)` pair display applicability is decided on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKind {
    pub entity_type: String,
    pub subtype: String,
}

impl EntityKind {
    pub fn new(entity_type: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            subtype: subtype.into(),
        }
    }

    pub fn is_file(&self) -> bool {
        self.entity_type == "file"
    }
}

impl Entity {
    /// Build a node-like entity
    pub fn new(
        entity_type: impl Into<String>,
        id: u64,
        bundle: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            id,
            uuid: Uuid::new_v4(),
            bundle: bundle.into(),
            label: label.into(),
            path: None,
            file: None,
        }
    }

    /// Build a `file` entity for a stored file
    pub fn file(id: u64, uri: impl Into<String>, mime: impl Into<String>) -> Self {
        let uri = uri.into();
        let filename = uri.rsplit('/').next().unwrap_or_default().to_string();
        Self {
            entity_type: "file".to_string(),
            id,
            uuid: Uuid::new_v4(),
            bundle: "file".to_string(),
            label: filename.clone(),
            path: None,
            file: Some(FileData {
                uri,
                filename,
                mime: mime.into(),
                size: 0,
            }),
        }
    }

    pub fn with_uuid(mut self, uuid: Uuid) -> Self {
        self.uuid = uuid;
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        if let Some(file) = self.file.as_mut() {
            file.size = size;
        }
        self
    }

    /// Subtype used for display applicability.
    ///
    /// Files are classified by the major part of their MIME type ("image",
    /// "text", ...); every other entity by its bundle.
    pub fn subtype(&self) -> &str {
        match &self.file {
            Some(file) => file.mime.split('/').next().unwrap_or_default(),
            None => &self.bundle,
        }
    }

    pub fn kind(&self) -> EntityKind {
        EntityKind::new(self.entity_type.clone(), self.subtype())
    }

    /// Canonical path of a non-file entity
    pub fn canonical_path(&self) -> String {
        self.path
            .clone()
            .unwrap_or_else(|| format!("/{}/{}", self.entity_type, self.id))
    }
}

/// Resolves entity references found in embed markup
pub trait EntityRepository: Send + Sync {
    /// Load an entity by its stable uuid
    fn load_by_uuid(&self, entity_type: &str, uuid: &Uuid) -> Option<Entity>;

    /// Load an entity by its numeric id
    fn load(&self, entity_type: &str, id: u64) -> Option<Entity>;

    /// Load by uuid, turning a miss into an [`EmbedError::EntityResolution`]
    fn resolve(&self, entity_type: &str, uuid: &Uuid) -> Result<Entity, EmbedError> {
        self.load_by_uuid(entity_type, uuid)
            .ok_or_else(|| EmbedError::EntityResolution {
                entity_type: entity_type.to_string(),
                reference: uuid.to_string(),
            })
    }
}

/// Serialized form of an [`InMemoryEntityStore`]
#[derive(Debug, Default, Deserialize, Serialize)]
struct StoreFile {
    entities: Vec<Entity>,
}

/// Repository backed by a map, loadable from JSON
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntityStore {
    entities: HashMap<(String, Uuid), Entity>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity, replacing any entity with the same type and uuid
    pub fn insert(&mut self, entity: Entity) {
        self.entities
            .insert((entity.entity_type.clone(), entity.uuid), entity);
    }

    pub fn remove(&mut self, entity_type: &str, uuid: &Uuid) -> Option<Entity> {
        self.entities.remove(&(entity_type.to_string(), *uuid))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Parse a store from `{"entities": [...]}`
    pub fn from_json_str(source: &str) -> Result<Self, serde_json::Error> {
        let file: StoreFile = serde_json::from_str(source)?;
        let mut store = Self::new();
        for entity in file.entities {
            store.insert(entity);
        }
        Ok(store)
    }

    /// Entities with the given type, ordered by id
    pub fn entities_of_type(&self, entity_type: &str) -> Vec<&Entity> {
        let mut found: Vec<_> = self
            .entities
            .values()
            .filter(|entity| entity.entity_type == entity_type)
            .collect();
        found.sort_by_key(|entity| entity.id);
        found
    }
}

impl FromIterator<Entity> for InMemoryEntityStore {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        let mut store = Self::new();
        for entity in iter {
            store.insert(entity);
        }
        store
    }
}

impl EntityRepository for InMemoryEntityStore {
    fn load_by_uuid(&self, entity_type: &str, uuid: &Uuid) -> Option<Entity> {
        self.entities
            .get(&(entity_type.to_string(), *uuid))
            .cloned()
    }

    fn load(&self, entity_type: &str, id: u64) -> Option<Entity> {
        self.entities
            .values()
            .find(|entity| entity.entity_type == entity_type && entity.id == id)
            .cloned()
    }
}
