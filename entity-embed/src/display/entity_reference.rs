//! Generic entity displays, usable for any entity type

use markup5ever_rcdom::Handle;

use super::schema::{bool_setting, FieldSchema, FormSchema};
use super::{Display, Overrides, Settings};
use crate::context::RenderContext;
use crate::entity::{Entity, EntityKind};
use crate::error::EmbedError;
use crate::markup::{create_text, create_text_element};

/// `entity_reference:entity_reference_label`: the entity label, optionally linked
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityReferenceLabel;

impl Display for EntityReferenceLabel {
    fn id(&self) -> &str {
        "entity_reference:entity_reference_label"
    }

    fn label(&self) -> &str {
        "Label"
    }

    fn applies_to(&self, _kind: &EntityKind) -> bool {
        true
    }

    fn configuration_schema(&self) -> FormSchema {
        FormSchema::new().field(FieldSchema::checkbox(
            "link",
            "Link label to the referenced entity",
            true,
        ))
    }

    fn render(
        &self,
        entity: &Entity,
        settings: &Settings,
        overrides: &Overrides,
        context: &RenderContext,
    ) -> Result<Vec<Handle>, EmbedError> {
        if !bool_setting(settings, "link", true) {
            return Ok(vec![create_text(&entity.label)]);
        }

        let href = context.entity_url(entity);
        let mut attrs = vec![("href", href.as_str())];
        if let Some(title) = overrides.title.as_deref() {
            attrs.push(("title", title));
        }
        Ok(vec![create_text_element("a", attrs, &entity.label)])
    }
}

/// `entity_reference:entity_reference_entity_id`: the bare numeric id
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityReferenceEntityId;

impl Display for EntityReferenceEntityId {
    fn id(&self) -> &str {
        "entity_reference:entity_reference_entity_id"
    }

    fn label(&self) -> &str {
        "Entity ID"
    }

    fn applies_to(&self, _kind: &EntityKind) -> bool {
        true
    }

    fn render(
        &self,
        entity: &Entity,
        _settings: &Settings,
        _overrides: &Overrides,
        _context: &RenderContext,
    ) -> Result<Vec<Handle>, EmbedError> {
        Ok(vec![create_text(&entity.id.to_string())])
    }
}
