//! Render context shared by every display
//!
//! Holds the site-level knobs displays need to produce links: where public
//! files are served from and how embed wrappers are marked up.

use url::Url;

use crate::entity::Entity;
use crate::error::EmbedError;

/// Default public files location
pub const DEFAULT_FILES_BASE_URL: &str = "http://localhost/sites/default/files/";

/// Default class of the element wrapping every rendered embed
pub const DEFAULT_WRAPPER_CLASS: &str = "embedded-entity";

#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    files_base_url: Url,
    wrapper_class: String,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            files_base_url: Url::parse(DEFAULT_FILES_BASE_URL).expect("default files url is valid"),
            wrapper_class: DEFAULT_WRAPPER_CLASS.to_string(),
        }
    }
}

impl RenderContext {
    /// Create a context serving public files from `files_base_url`
    ///
    /// A trailing slash is added when missing so that relative paths join
    /// below the base instead of replacing its last segment.
    pub fn new(files_base_url: &str) -> Result<Self, EmbedError> {
        let normalized = if files_base_url.ends_with('/') {
            files_base_url.to_string()
        } else {
            format!("{files_base_url}/")
        };
        let files_base_url = Url::parse(&normalized).map_err(|e| {
            EmbedError::InvalidSettings(format!("files base url '{files_base_url}': {e}"))
        })?;
        Ok(Self {
            files_base_url,
            ..Self::default()
        })
    }

    pub fn with_wrapper_class(mut self, class: impl Into<String>) -> Self {
        self.wrapper_class = class.into();
        self
    }

    pub fn files_base_url(&self) -> &Url {
        &self.files_base_url
    }

    pub fn wrapper_class(&self) -> &str {
        &self.wrapper_class
    }

    /// Public URL for a stored file URI
    ///
    /// `public://` URIs resolve below the files base url, absolute web URLs
    /// pass through and anything else is treated as a site-relative path.
    pub fn file_url(&self, uri: &str) -> String {
        if let Some(path) = uri.strip_prefix("public://") {
            return self.join(path);
        }
        if uri.starts_with("http://") || uri.starts_with("https://") {
            return uri.to_string();
        }
        format!("/{}", uri.trim_start_matches('/'))
    }

    /// URL of an image style derivative of a stored file
    pub fn image_style_url(&self, style: &str, uri: &str) -> String {
        match uri.split_once("://") {
            Some((scheme, path)) if scheme != "http" && scheme != "https" => {
                self.join(&format!("styles/{style}/{scheme}/{path}"))
            }
            _ => self.file_url(uri),
        }
    }

    /// URL an entity links to: the file itself for files, the canonical path otherwise
    pub fn entity_url(&self, entity: &Entity) -> String {
        match &entity.file {
            Some(file) => self.file_url(&file.uri),
            None => entity.canonical_path(),
        }
    }

    fn join(&self, path: &str) -> String {
        match self.files_base_url.join(path) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}{}", self.files_base_url, path),
        }
    }
}
