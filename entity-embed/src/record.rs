//! Embed markup records
//!
//! An [`EmbedRecord`] is what an editor commits into a rich-text field: a
//! placeholder element whose attributes name the entity, the display and its
//! settings.
//!
//! ```html
//! <div data-entity-type="file"
//!      data-entity-uuid="..."
//!      data-entity-embed-display="image:image"
//!      data-entity-embed-settings='{"image_link":"file"}'
//!      alt="Sample" title="Sample title">Placeholder</div>
//! ```
//!
//! The element content is an editor-side placeholder and never part of the
//! record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;
use uuid::Uuid;

use crate::display::{Overrides, Settings};
use crate::error::EmbedError;

pub const ATTR_ENTITY_TYPE: &str = "data-entity-type";
pub const ATTR_ENTITY_UUID: &str = "data-entity-uuid";
pub const ATTR_ENTITY_ID: &str = "data-entity-id";
pub const ATTR_DISPLAY: &str = "data-entity-embed-display";
pub const ATTR_SETTINGS: &str = "data-entity-embed-settings";
pub const ATTR_ALT: &str = "alt";
pub const ATTR_TITLE: &str = "title";

/// How the embedded entity is referenced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityReference {
    /// Stable uuid, survives content migration
    Uuid(Uuid),
    /// Numeric id, accepted for markup written before uuids were stored
    Id(u64),
}

impl std::fmt::Display for EntityReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityReference::Uuid(uuid) => write!(f, "{uuid}"),
            EntityReference::Id(id) => write!(f, "{id}"),
        }
    }
}

/// One inline entity embed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedRecord {
    pub entity_type: String,
    pub entity_reference: EntityReference,
    pub display_plugin_id: String,
    #[serde(default)]
    pub display_settings: Settings,
    #[serde(default)]
    pub overrides: Overrides,
}

impl EmbedRecord {
    pub fn new(
        entity_type: impl Into<String>,
        uuid: Uuid,
        display_plugin_id: impl Into<String>,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_reference: EntityReference::Uuid(uuid),
            display_plugin_id: display_plugin_id.into(),
            display_settings: Settings::new(),
            overrides: Overrides::default(),
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.display_settings = settings;
        self
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Whether an element with these attributes is an embed placeholder
    pub fn is_embed<'a, I>(attrs: I) -> bool
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let (mut has_type, mut has_reference, mut has_display) = (false, false, false);
        for (name, _) in attrs {
            match name {
                ATTR_ENTITY_TYPE => has_type = true,
                ATTR_ENTITY_UUID | ATTR_ENTITY_ID => has_reference = true,
                ATTR_DISPLAY => has_display = true,
                _ => {}
            }
        }
        has_type && has_reference && has_display
    }

    /// Read a record from placeholder attributes
    ///
    /// Malformed `data-entity-embed-settings` JSON is not an error: the record
    /// gets empty settings and the display falls back to its defaults.
    pub fn from_attributes<'a, I>(attrs: I) -> Result<Self, EmbedError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut entity_type = None;
        let mut uuid = None;
        let mut id = None;
        let mut display = None;
        let mut settings = Settings::new();
        let mut overrides = Overrides::default();

        for (name, value) in attrs {
            match name {
                ATTR_ENTITY_TYPE => entity_type = Some(value.to_string()),
                ATTR_ENTITY_UUID => uuid = Some(value),
                ATTR_ENTITY_ID => id = Some(value),
                ATTR_DISPLAY => display = Some(value.to_string()),
                ATTR_SETTINGS => settings = decode_settings(value),
                ATTR_ALT => overrides.alt = Some(value.to_string()),
                ATTR_TITLE => overrides.title = Some(value.to_string()),
                _ => {}
            }
        }

        let entity_type = entity_type
            .filter(|t| !t.is_empty())
            .ok_or_else(|| EmbedError::InvalidRecord(format!("missing {ATTR_ENTITY_TYPE}")))?;
        let display_plugin_id = display
            .filter(|d| !d.is_empty())
            .ok_or_else(|| EmbedError::InvalidRecord(format!("missing {ATTR_DISPLAY}")))?;
        let entity_reference = match (uuid, id) {
            (Some(uuid), _) => Uuid::parse_str(uuid.trim())
                .map(EntityReference::Uuid)
                .map_err(|e| EmbedError::InvalidRecord(format!("bad {ATTR_ENTITY_UUID} '{uuid}': {e}")))?,
            (None, Some(id)) => id
                .trim()
                .parse()
                .map(EntityReference::Id)
                .map_err(|e| EmbedError::InvalidRecord(format!("bad {ATTR_ENTITY_ID} '{id}': {e}")))?,
            (None, None) => {
                return Err(EmbedError::InvalidRecord(format!(
                    "missing {ATTR_ENTITY_UUID}"
                )))
            }
        };

        Ok(Self {
            entity_type,
            entity_reference,
            display_plugin_id,
            display_settings: settings,
            overrides,
        })
    }

    /// Placeholder attributes for this record, in canonical order
    pub fn to_attributes(&self) -> Vec<(String, String)> {
        let reference = match self.entity_reference {
            EntityReference::Uuid(uuid) => (ATTR_ENTITY_UUID, uuid.to_string()),
            EntityReference::Id(id) => (ATTR_ENTITY_ID, id.to_string()),
        };
        let mut attrs = vec![
            (ATTR_ENTITY_TYPE.to_string(), self.entity_type.clone()),
            (reference.0.to_string(), reference.1),
            (ATTR_DISPLAY.to_string(), self.display_plugin_id.clone()),
            (
                ATTR_SETTINGS.to_string(),
                Value::Object(self.display_settings.clone()).to_string(),
            ),
        ];
        if let Some(alt) = &self.overrides.alt {
            attrs.push((ATTR_ALT.to_string(), alt.clone()));
        }
        if let Some(title) = &self.overrides.title {
            attrs.push((ATTR_TITLE.to_string(), title.clone()));
        }
        attrs
    }

    /// Attributes as a JSON object, the shape the editor client consumes
    pub fn to_attribute_map(&self) -> Map<String, Value> {
        self.to_attributes()
            .into_iter()
            .map(|(name, value)| (name, Value::String(value)))
            .collect()
    }
}

fn decode_settings(value: &str) -> Settings {
    if value.trim().is_empty() {
        return Settings::new();
    }
    match serde_json::from_str::<Value>(value) {
        Ok(Value::Object(settings)) => settings,
        Ok(other) => {
            warn!(settings = %other, "embed settings are not an object, using defaults");
            Settings::new()
        }
        Err(e) => {
            warn!(error = %e, "malformed embed settings, using defaults");
            Settings::new()
        }
    }
}
