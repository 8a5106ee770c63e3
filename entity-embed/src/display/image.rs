//! Image display (`image:image`)
//!
//! Renders image files as `<img>`, optionally through an image style
//! derivative and optionally linked to the file or its entity. Only offered
//! for file entities whose MIME class is `image`.

use markup5ever_rcdom::Handle;
use serde::Deserialize;

use super::schema::{string_setting, FieldSchema, FormSchema};
use super::{Display, Overrides, Settings};
use crate::context::RenderContext;
use crate::entity::{Entity, EntityKind};
use crate::error::EmbedError;
use crate::markup::{append, create_element};

/// Maximum length of the alternate text
pub const ALT_MAX_LENGTH: usize = 512;

/// Maximum length of the title
pub const TITLE_MAX_LENGTH: usize = 1024;

/// A named image derivative
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageStyle {
    pub id: String,
    pub label: String,
}

impl ImageStyle {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Styles available when nothing else is configured
pub fn default_image_styles() -> Vec<ImageStyle> {
    vec![
        ImageStyle::new("thumbnail", "Thumbnail (100×100)"),
        ImageStyle::new("medium", "Medium (220×220)"),
        ImageStyle::new("large", "Large (480×480)"),
    ]
}

#[derive(Debug, Clone)]
pub struct ImageDisplay {
    styles: Vec<ImageStyle>,
}

impl Default for ImageDisplay {
    fn default() -> Self {
        Self::new(default_image_styles())
    }
}

impl ImageDisplay {
    pub fn new(styles: Vec<ImageStyle>) -> Self {
        Self { styles }
    }

    pub fn styles(&self) -> &[ImageStyle] {
        &self.styles
    }
}

impl Display for ImageDisplay {
    fn id(&self) -> &str {
        "image:image"
    }

    fn label(&self) -> &str {
        "Image"
    }

    fn applies_to(&self, kind: &EntityKind) -> bool {
        kind.is_file() && kind.subtype == "image"
    }

    fn configuration_schema(&self) -> FormSchema {
        let mut style_options = vec![("", "None (original image)")];
        style_options.extend(
            self.styles
                .iter()
                .map(|style| (style.id.as_str(), style.label.as_str())),
        );

        FormSchema::new()
            .field(FieldSchema::select(
                "image_style",
                "Image style",
                style_options,
                "",
            ))
            .field(FieldSchema::select(
                "image_link",
                "Link image to",
                vec![("", "Nothing"), ("content", "Content"), ("file", "File")],
                "",
            ))
            .field(
                FieldSchema::textfield("alt", "Alternate text", Some(ALT_MAX_LENGTH)).with_description(
                    "This text will be used by screen readers, search engines, or when the image cannot be loaded.",
                ),
            )
            .field(
                FieldSchema::textfield("title", "Title", Some(TITLE_MAX_LENGTH)).with_description(
                    "The title is used as a tool tip when the user hovers the mouse over the image.",
                ),
            )
    }

    fn render(
        &self,
        entity: &Entity,
        settings: &Settings,
        overrides: &Overrides,
        context: &RenderContext,
    ) -> Result<Vec<Handle>, EmbedError> {
        let file = entity.file.as_ref().ok_or_else(|| {
            EmbedError::InvalidRecord(format!("file entity {} has no stored file", entity.id))
        })?;

        let src = match string_setting(settings, "image_style") {
            "" => context.file_url(&file.uri),
            style => context.image_style_url(style, &file.uri),
        };
        let alt = overrides.alt_or(string_setting(settings, "alt"));
        let title = overrides.title_or(string_setting(settings, "title"));

        let mut attrs = vec![("src", src.as_str()), ("alt", alt)];
        if !title.is_empty() {
            attrs.push(("title", title));
        }
        let img = create_element("img", attrs);

        let href = match string_setting(settings, "image_link") {
            "file" => Some(context.file_url(&file.uri)),
            "content" => Some(context.entity_url(entity)),
            _ => None,
        };

        Ok(match href {
            Some(href) => {
                let link = create_element("a", vec![("href", &href)]);
                append(&link, img);
                vec![link]
            }
            None => vec![img],
        })
    }
}
