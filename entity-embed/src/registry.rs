//! Display registry for display discovery and selection
//!
//! This module provides the catalog of every installed display. Displays are
//! registered once at startup and looked up by id; the catalog also answers
//! which displays can render a given entity.
//!
//! A populated [`DisplayRegistry`] is treated as immutable. Code that needs
//! to pick up new displays at runtime holds a [`SharedRegistry`] and swaps in
//! a freshly built registry as a whole, so readers always see a complete
//! catalog.

use arc_swap::ArcSwap;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::display::entity_reference::{EntityReferenceEntityId, EntityReferenceLabel};
use crate::display::file::{FileDefault, FileRssEnclosure, FileTable, FileUrlPlain};
use crate::display::image::{default_image_styles, ImageDisplay, ImageStyle};
use crate::display::{Display, DisplayInstance, FormSchema, Settings};
use crate::entity::Entity;
use crate::error::EmbedError;

/// Registry of embed displays
///
/// # Examples
///
/// ```ignore
/// let registry = DisplayRegistry::with_defaults();
///
/// let options = registry.definition_options_for_entity(&image);
/// assert!(options.contains_key("image:image"));
///
/// let display = registry.instantiate("image:image", &Settings::new())?;
/// let form = registry.build_configuration_form(&display, &image);
/// ```
pub struct DisplayRegistry {
    displays: BTreeMap<String, Arc<dyn Display>>,
}

impl std::fmt::Debug for DisplayRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayRegistry")
            .field("displays", &self.list_displays())
            .finish()
    }
}

impl DisplayRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        DisplayRegistry {
            displays: BTreeMap::new(),
        }
    }

    /// Register a display
    ///
    /// If a display with the same id already exists, it will be replaced.
    pub fn register<D: Display + 'static>(&mut self, display: D) {
        self.displays
            .insert(display.id().to_string(), Arc::new(display));
    }

    /// Get a display by id
    pub fn get(&self, id: &str) -> Result<&dyn Display, EmbedError> {
        self.displays
            .get(id)
            .map(|d| d.as_ref())
            .ok_or_else(|| EmbedError::UnknownPlugin(id.to_string()))
    }

    /// Check if a display exists
    pub fn has(&self, id: &str) -> bool {
        self.displays.contains_key(id)
    }

    /// List all registered display ids (sorted)
    pub fn list_displays(&self) -> Vec<String> {
        self.displays.keys().cloned().collect()
    }

    /// Displays able to render `entity`, ordered by id
    pub fn list_applicable(&self, entity: &Entity) -> Vec<&dyn Display> {
        let kind = entity.kind();
        self.displays
            .values()
            .filter(|display| display.applies_to(&kind))
            .map(|display| display.as_ref())
            .collect()
    }

    /// Id → label options for the displays able to render `entity`
    pub fn definition_options_for_entity(&self, entity: &Entity) -> BTreeMap<String, String> {
        self.list_applicable(entity)
            .into_iter()
            .map(|display| (display.id().to_string(), display.label().to_string()))
            .collect()
    }

    /// Bind settings to a display
    ///
    /// Settings are reconciled with the display's schema: unknown keys are
    /// dropped and missing ones take the declared defaults.
    pub fn instantiate(&self, id: &str, settings: &Settings) -> Result<DisplayInstance, EmbedError> {
        let display = self
            .displays
            .get(id)
            .ok_or_else(|| EmbedError::UnknownPlugin(id.to_string()))?;
        debug!(display = id, "instantiating display");
        Ok(DisplayInstance::new(Arc::clone(display), settings))
    }

    /// Instantiate a display and check it can render `entity`
    pub fn instantiate_for(
        &self,
        id: &str,
        settings: &Settings,
        entity: &Entity,
    ) -> Result<DisplayInstance, EmbedError> {
        let instance = self.instantiate(id, settings)?;
        if !instance.applies_to(entity) {
            return Err(EmbedError::InapplicablePlugin {
                plugin: id.to_string(),
                entity_type: entity.entity_type.clone(),
                subtype: entity.subtype().to_string(),
            });
        }
        Ok(instance)
    }

    /// Configuration form of a display instance for `entity`
    pub fn build_configuration_form(&self, instance: &DisplayInstance, entity: &Entity) -> FormSchema {
        instance.build_configuration_form(entity)
    }

    /// Create a registry with default displays
    pub fn with_defaults() -> Self {
        Self::with_image_styles(default_image_styles())
    }

    /// Create a registry with default displays, offering `styles` to the image display
    pub fn with_image_styles(styles: Vec<ImageStyle>) -> Self {
        let mut registry = Self::new();

        // Register built-in displays
        registry.register(EntityReferenceLabel);
        registry.register(EntityReferenceEntityId);
        registry.register(FileDefault);
        registry.register(FileTable);
        registry.register(FileUrlPlain);
        registry.register(FileRssEnclosure);
        registry.register(ImageDisplay::new(styles));

        registry
    }
}

impl Default for DisplayRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Handle to a registry that can be replaced at runtime
///
/// Cloning the handle shares the same underlying slot. Readers take a
/// [`snapshot`](SharedRegistry::snapshot) and keep using it for the whole
/// operation, even if a [`swap`](SharedRegistry::swap) happens meanwhile.
#[derive(Clone)]
pub struct SharedRegistry {
    current: Arc<ArcSwap<DisplayRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: DisplayRegistry) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(registry)),
        }
    }

    /// Current registry
    pub fn snapshot(&self) -> Arc<DisplayRegistry> {
        self.current.load_full()
    }

    /// Replace the whole registry, returning the previous one
    pub fn swap(&self, registry: DisplayRegistry) -> Arc<DisplayRegistry> {
        let previous = self.current.swap(Arc::new(registry));
        debug!(
            displays = self.current.load().displays.len(),
            "display registry swapped"
        );
        previous
    }
}

impl Default for SharedRegistry {
    fn default() -> Self {
        Self::new(DisplayRegistry::with_defaults())
    }
}
