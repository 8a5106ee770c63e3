//! Shared configuration loader for entity-embed tools.
//!
//! `defaults/entity-embed.default.toml` is embedded into every binary so that
//! docs and runtime behavior stay in sync. Applications layer user-specific
//! files on top of those defaults via [`Loader`] before deserializing into
//! [`EmbedConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use entity_embed::display::image::ImageStyle;
use entity_embed::{DisplayRegistry, EmbedError, RenderContext};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/entity-embed.default.toml");

/// Top-level configuration consumed by entity-embed applications.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbedConfig {
    pub render: RenderConfig,
    pub image: ImageConfig,
    pub logging: LoggingConfig,
}

/// Where rendered markup points and how it is wrapped.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub files_base_url: String,
    pub wrapper_class: String,
}

impl RenderConfig {
    pub fn to_context(&self) -> Result<RenderContext, EmbedError> {
        Ok(RenderContext::new(&self.files_base_url)?.with_wrapper_class(&self.wrapper_class))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageConfig {
    #[serde(default)]
    pub styles: Vec<ImageStyle>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
}

impl EmbedConfig {
    /// Registry with the built-in displays, offering the configured image styles
    pub fn registry(&self) -> DisplayRegistry {
        DisplayRegistry::with_image_styles(self.image.styles.clone())
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<EmbedConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<EmbedConfig, ConfigError> {
    Loader::new().build()
}
