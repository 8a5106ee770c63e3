//! Display trait definition
//!
//! A display turns an entity plus its settings into markup. Every display is
//! identified by a `<provider>:<name>` id (`image:image`, `file:file_table`)
//! and decides for itself which entity kinds it can render.
//!
//! # Examples
//!
//! ```ignore
//! struct LabelOnly;
//!
//! impl Display for LabelOnly {
//!     fn id(&self) -> &str {
//!         "example:label_only"
//!     }
//!
//!     fn label(&self) -> &str {
//!         "Label only"
//!     }
//!
//!     fn applies_to(&self, _kind: &EntityKind) -> bool {
//!         true
//!     }
//!
//!     fn render(&self, entity: &Entity, _: &Settings, _: &Overrides, _: &RenderContext)
//!         -> Result<Vec<Handle>, EmbedError>
//!     {
//!         Ok(vec![create_text(&entity.label)])
//!     }
//! }
//! ```

pub mod entity_reference;
pub mod file;
pub mod image;
pub mod schema;

use markup5ever_rcdom::Handle;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::context::RenderContext;
use crate::entity::{Entity, EntityKind};
use crate::error::EmbedError;
use crate::markup::Markup;
pub use schema::{FieldSchema, FieldType, FormSchema, Settings};

/// Free-text attributes layered over whatever a display computes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Overrides {
    pub fn new(alt: Option<String>, title: Option<String>) -> Self {
        Self { alt, title }
    }

    pub fn is_empty(&self) -> bool {
        self.alt.is_none() && self.title.is_none()
    }

    /// Override if present, otherwise the display's own value
    pub fn alt_or<'a>(&'a self, computed: &'a str) -> &'a str {
        self.alt.as_deref().unwrap_or(computed)
    }

    pub fn title_or<'a>(&'a self, computed: &'a str) -> &'a str {
        self.title.as_deref().unwrap_or(computed)
    }
}

/// Trait for embed displays
///
/// Implementors are registered once in a
/// [`DisplayRegistry`](crate::registry::DisplayRegistry) and shared by every
/// render, so they must not keep per-render state.
pub trait Display: Send + Sync {
    /// Unique id, formatted as `<provider>:<name>`
    fn id(&self) -> &str;

    /// Human-readable name shown in the embed dialog
    fn label(&self) -> &str;

    /// Provider part of the id
    fn provider(&self) -> &str {
        self.id().split(':').next().unwrap_or_default()
    }

    /// Whether this display can render entities of the given kind
    fn applies_to(&self, kind: &EntityKind) -> bool;

    /// Settings this display understands, with their defaults
    ///
    /// Defaults to no settings.
    fn configuration_schema(&self) -> FormSchema {
        FormSchema::new()
    }

    /// Configuration form for `entity`, pre-filled with `settings`
    fn build_configuration_form(&self, settings: &Settings, _entity: &Entity) -> FormSchema {
        self.configuration_schema().with_values(settings)
    }

    /// Validate submitted settings
    ///
    /// Default implementation checks the values against the configuration
    /// schema. Displays with cross-field rules should extend it.
    fn validate(&self, settings: &Settings, _entity: &Entity) -> Result<(), EmbedError> {
        self.configuration_schema().validate(settings).into_result()
    }

    /// Render the entity with already merged settings
    fn render(
        &self,
        entity: &Entity,
        settings: &Settings,
        overrides: &Overrides,
        context: &RenderContext,
    ) -> Result<Vec<Handle>, EmbedError>;
}

/// A display bound to concrete settings
#[derive(Clone)]
pub struct DisplayInstance {
    display: Arc<dyn Display>,
    settings: Settings,
}

impl std::fmt::Debug for DisplayInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayInstance")
            .field("id", &self.display.id())
            .field("settings", &self.settings)
            .finish()
    }
}

impl DisplayInstance {
    /// Bind `settings` to `display`, reconciled with its schema
    pub(crate) fn new(display: Arc<dyn Display>, settings: &Settings) -> Self {
        let settings = display.configuration_schema().merge(settings);
        Self { display, settings }
    }

    pub fn id(&self) -> &str {
        self.display.id()
    }

    pub fn label(&self) -> &str {
        self.display.label()
    }

    pub fn display(&self) -> &dyn Display {
        self.display.as_ref()
    }

    /// Settings reconciled with the display's schema
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn applies_to(&self, entity: &Entity) -> bool {
        self.display.applies_to(&entity.kind())
    }

    /// Configuration form pre-filled with this instance's settings
    pub fn build_configuration_form(&self, entity: &Entity) -> FormSchema {
        self.display.build_configuration_form(&self.settings, entity)
    }

    pub fn validate(&self, entity: &Entity) -> Result<(), EmbedError> {
        self.display.validate(&self.settings, entity)
    }

    /// Render the entity as nodes
    pub fn render_nodes(
        &self,
        entity: &Entity,
        overrides: &Overrides,
        context: &RenderContext,
    ) -> Result<Vec<Handle>, EmbedError> {
        self.display.render(entity, &self.settings, overrides, context)
    }

    /// Render the entity to serialized markup
    pub fn render(
        &self,
        entity: &Entity,
        overrides: &Overrides,
        context: &RenderContext,
    ) -> Result<Markup, EmbedError> {
        let nodes = self.render_nodes(entity, overrides, context)?;
        Markup::from_nodes(&nodes)
    }
}
