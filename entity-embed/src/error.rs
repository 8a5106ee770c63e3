//! Error types for embed operations

use std::fmt;
use thiserror::Error;

/// Field-level validation messages produced by a display's configuration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<(String, String)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a form field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push((field.into(), message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Message recorded for `field`, if any
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }

    /// Turn the collected messages into a result
    pub fn into_result(self) -> Result<(), EmbedError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(EmbedError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Errors that can occur while resolving, configuring or rendering an embed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmbedError {
    /// Display plugin id is not registered
    #[error("Display plugin '{0}' not found")]
    UnknownPlugin(String),

    /// Display plugin is registered but refuses the entity
    #[error("Display plugin '{plugin}' cannot render {entity_type} entities of kind '{subtype}'")]
    InapplicablePlugin {
        plugin: String,
        entity_type: String,
        subtype: String,
    },

    /// Referenced entity does not exist (anymore)
    #[error("Unable to load {entity_type} entity '{reference}'")]
    EntityResolution {
        entity_type: String,
        reference: String,
    },

    /// Configuration form values did not pass the display's validation
    #[error("Invalid display settings: {0}")]
    Validation(ValidationErrors),

    /// Embed markup is missing required attributes or carries bad values
    #[error("Invalid embed record: {0}")]
    InvalidRecord(String),

    /// Settings could not be decoded
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Dialog operation is not allowed in its current step
    #[error("Cannot {action} while the dialog is {step}")]
    DialogState {
        action: &'static str,
        step: &'static str,
    },

    /// Markup could not be produced or serialized
    #[error("Markup error: {0}")]
    Markup(String),
}

impl EmbedError {
    /// Stale or broken references, as opposed to failures of a display itself.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            EmbedError::UnknownPlugin(_)
                | EmbedError::InapplicablePlugin { .. }
                | EmbedError::EntityResolution { .. }
                | EmbedError::InvalidRecord(_)
        )
    }
}
