//! Embed selection dialog
//!
//! The dialog walks an editor through picking an entity, picking one of the
//! displays able to render it and configuring that display. Committing hands
//! the resulting embed to the editor client through a
//! [`SelectDialogSave`] command; the dialog itself never touches the document.
//!
//! ```text
//! PickingEntity -> PickingDisplay -> ConfiguringDisplay -> Committed
//! ```
//!
//! Each dialog belongs to one editing session and is not shared between
//! threads. Registry and repository are injected and only read.

use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::ajax::{AjaxResponse, CloseDialog, SelectDialogSave};
use crate::display::{FormSchema, Overrides, Settings};
use crate::entity::{Entity, EntityRepository};
use crate::error::EmbedError;
use crate::record::{EmbedRecord, EntityReference, ATTR_ALT, ATTR_TITLE};
use crate::registry::DisplayRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogStep {
    PickingEntity,
    PickingDisplay,
    ConfiguringDisplay,
    Committed,
}

impl DialogStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogStep::PickingEntity => "picking an entity",
            DialogStep::PickingDisplay => "picking a display",
            DialogStep::ConfiguringDisplay => "configuring the display",
            DialogStep::Committed => "committed",
        }
    }
}

impl std::fmt::Display for DialogStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of one embed dialog session
pub struct SelectDialog {
    registry: Arc<DisplayRegistry>,
    repository: Arc<dyn EntityRepository>,
    step: DialogStep,
    entity: Option<Entity>,
    display_id: Option<String>,
    settings: Settings,
    overrides: Overrides,
    record: Option<EmbedRecord>,
}

impl SelectDialog {
    pub fn new(registry: Arc<DisplayRegistry>, repository: Arc<dyn EntityRepository>) -> Self {
        Self {
            registry,
            repository,
            step: DialogStep::PickingEntity,
            entity: None,
            display_id: None,
            settings: Settings::new(),
            overrides: Overrides::default(),
            record: None,
        }
    }

    /// Reopen the dialog on an embed already in the document
    ///
    /// The dialog starts at the configuration step with the record's display,
    /// settings and overrides filled in.
    pub fn edit(
        registry: Arc<DisplayRegistry>,
        repository: Arc<dyn EntityRepository>,
        record: &EmbedRecord,
    ) -> Result<Self, EmbedError> {
        let entity = match &record.entity_reference {
            EntityReference::Uuid(uuid) => repository.resolve(&record.entity_type, uuid)?,
            EntityReference::Id(id) => repository
                .load(&record.entity_type, *id)
                .ok_or_else(|| EmbedError::EntityResolution {
                    entity_type: record.entity_type.clone(),
                    reference: id.to_string(),
                })?,
        };
        let instance = registry.instantiate_for(
            &record.display_plugin_id,
            &record.display_settings,
            &entity,
        )?;

        Ok(Self {
            step: DialogStep::ConfiguringDisplay,
            display_id: Some(instance.id().to_string()),
            settings: instance.settings().clone(),
            overrides: record.overrides.clone(),
            entity: Some(entity),
            ..Self::new(registry, repository)
        })
    }

    pub fn step(&self) -> DialogStep {
        self.step
    }

    pub fn entity(&self) -> Option<&Entity> {
        self.entity.as_ref()
    }

    /// Chosen display, kept across steps as long as it fits the entity
    pub fn display_id(&self) -> Option<&str> {
        self.display_id.as_deref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    /// The committed embed, once the dialog is done
    pub fn record(&self) -> Option<&EmbedRecord> {
        self.record.as_ref()
    }

    /// Pick the entity to embed
    ///
    /// A display chosen earlier survives, with its settings, when it can also
    /// render the new entity. Otherwise the display choice is cleared.
    pub fn select_entity(&mut self, entity_type: &str, uuid: &Uuid) -> Result<&Entity, EmbedError> {
        self.ensure_open("select an entity")?;
        let entity = self.repository.resolve(entity_type, uuid)?;

        let keep_display = self
            .display_id
            .as_deref()
            .and_then(|id| self.registry.get(id).ok())
            .is_some_and(|display| display.applies_to(&entity.kind()));
        if !keep_display {
            if let Some(previous) = self.display_id.take() {
                debug!(display = %previous, "display no longer applies, resetting");
            }
            self.settings = Settings::new();
            self.overrides = Overrides::default();
        }

        debug!(entity_type, uuid = %uuid, "entity selected");
        self.step = DialogStep::PickingDisplay;
        Ok(self.entity.insert(entity))
    }

    /// Displays the editor can choose from for the selected entity
    pub fn display_options(&self) -> Result<BTreeMap<String, String>, EmbedError> {
        let entity = self.require_entity("list displays")?;
        Ok(self.registry.definition_options_for_entity(entity))
    }

    /// Pick the display for the selected entity
    ///
    /// Choosing the display already selected keeps its settings.
    pub fn select_display(&mut self, display_id: &str) -> Result<(), EmbedError> {
        self.ensure_open("select a display")?;
        let entity = self.require_entity("select a display")?;

        let settings = if self.display_id.as_deref() == Some(display_id) {
            self.settings.clone()
        } else {
            Settings::new()
        };
        let instance = self.registry.instantiate_for(display_id, &settings, entity)?;

        debug!(display = display_id, "display selected");
        self.settings = instance.settings().clone();
        self.display_id = Some(display_id.to_string());
        self.step = DialogStep::ConfiguringDisplay;
        Ok(())
    }

    /// Configuration form of the chosen display, filled with the current values
    pub fn configuration_form(&self) -> Result<FormSchema, EmbedError> {
        self.ensure_step(DialogStep::ConfiguringDisplay, "build the configuration form")?;
        let (display_id, entity) = self.selection("build the configuration form")?;
        let instance = self.registry.instantiate(display_id, &self.settings)?;
        Ok(self.registry.build_configuration_form(&instance, entity))
    }

    /// Submit the configuration form
    ///
    /// Values are checked by the display before they are taken over. On a
    /// validation error nothing changes and the messages name the offending
    /// fields.
    pub fn configure(&mut self, values: &Settings, overrides: Overrides) -> Result<(), EmbedError> {
        self.ensure_step(DialogStep::ConfiguringDisplay, "configure the display")?;
        let (display_id, entity) = self.selection("configure the display")?;

        let display = self.registry.get(display_id)?;
        display.validate(&with_overrides(values, &overrides), entity)?;
        let instance = self.registry.instantiate(display_id, values)?;

        self.settings = instance.settings().clone();
        self.overrides = overrides;
        Ok(())
    }

    /// Return to the previous step, keeping everything entered so far
    pub fn back(&mut self) -> Result<DialogStep, EmbedError> {
        self.step = match self.step {
            DialogStep::ConfiguringDisplay => DialogStep::PickingDisplay,
            DialogStep::PickingDisplay => DialogStep::PickingEntity,
            step => {
                return Err(EmbedError::DialogState {
                    action: "go back",
                    step: step.as_str(),
                })
            }
        };
        Ok(self.step)
    }

    /// Finish the dialog
    ///
    /// Returns the commands for the editor client: save the embed, then close
    /// the dialog. The saved values are the embed's placeholder attributes
    /// under `attributes`.
    pub fn commit(&mut self) -> Result<AjaxResponse, EmbedError> {
        self.ensure_step(DialogStep::ConfiguringDisplay, "commit")?;
        let (display_id, entity) = self.selection("commit")?;

        let instance = self
            .registry
            .instantiate_for(display_id, &self.settings, entity)?;
        instance
            .display()
            .validate(&with_overrides(instance.settings(), &self.overrides), entity)?;

        let record = EmbedRecord::new(entity.entity_type.clone(), entity.uuid, display_id)
            .with_settings(instance.settings().clone())
            .with_overrides(self.overrides.clone());

        let mut response = AjaxResponse::new();
        response
            .add_command(SelectDialogSave::new(json!({
                "attributes": record.to_attribute_map(),
            })))
            .add_command(CloseDialog::default());

        debug!(
            display = %record.display_plugin_id,
            entity_type = %record.entity_type,
            "embed dialog committed"
        );
        self.record = Some(record);
        self.step = DialogStep::Committed;
        Ok(response)
    }

    fn ensure_open(&self, action: &'static str) -> Result<(), EmbedError> {
        if self.step == DialogStep::Committed {
            return Err(EmbedError::DialogState {
                action,
                step: self.step.as_str(),
            });
        }
        Ok(())
    }

    fn ensure_step(&self, expected: DialogStep, action: &'static str) -> Result<(), EmbedError> {
        if self.step != expected {
            return Err(EmbedError::DialogState {
                action,
                step: self.step.as_str(),
            });
        }
        Ok(())
    }

    fn require_entity(&self, action: &'static str) -> Result<&Entity, EmbedError> {
        self.entity.as_ref().ok_or(EmbedError::DialogState {
            action,
            step: self.step.as_str(),
        })
    }

    fn selection(&self, action: &'static str) -> Result<(&str, &Entity), EmbedError> {
        let entity = self.require_entity(action)?;
        let display_id = self.display_id.as_deref().ok_or(EmbedError::DialogState {
            action,
            step: self.step.as_str(),
        })?;
        Ok((display_id, entity))
    }
}

/// Settings with the alt/title overrides folded in, for validation
fn with_overrides(values: &Settings, overrides: &Overrides) -> Settings {
    let mut checked = values.clone();
    if let Some(alt) = &overrides.alt {
        checked.insert(ATTR_ALT.to_string(), alt.clone().into());
    }
    if let Some(title) = &overrides.title {
        checked.insert(ATTR_TITLE.to_string(), title.clone().into());
    }
    checked
}
