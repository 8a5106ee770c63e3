//! File displays
//!
//! These render any `file` entity, whatever its MIME class: an image is still
//! a file, so every display here is offered for images too.
//!
//! | Id                        | Output                                          |
//! |---------------------------|-------------------------------------------------|
//! | `file:file_default`       | `<span class="file ..."><a href type>name</a></span>` |
//! | `file:file_table`         | one-row attachment table with the file size     |
//! | `file:file_url_plain`     | the bare file URL as text                       |
//! | `file:file_rss_enclosure` | `<enclosure>` element, feed output only         |

use markup5ever_rcdom::Handle;

use super::{Display, Overrides, Settings};
use crate::context::RenderContext;
use crate::entity::{Entity, EntityKind, FileData};
use crate::error::EmbedError;
use crate::markup::{append, create_element, create_text, create_text_element};

fn file_data(entity: &Entity) -> Result<&FileData, EmbedError> {
    entity.file.as_ref().ok_or_else(|| {
        EmbedError::InvalidRecord(format!(
            "{} entity {} has no stored file",
            entity.entity_type, entity.id
        ))
    })
}

/// CSS classes describing a file's MIME type, e.g. `file file--mime-image-png file--image`
fn file_classes(file: &FileData) -> String {
    let mime_class = file.mime.replace(['/', '.', '+'], "-");
    let icon = match file.mime.split('/').next().unwrap_or_default() {
        "image" => "image",
        "text" => "text",
        "video" => "video",
        "audio" => "audio",
        _ => match file.mime.as_str() {
            "application/pdf" => "application-pdf",
            "application/zip" | "application/x-gzip" | "application/x-tar" => "package-x-generic",
            _ => "general",
        },
    };
    format!("file file--mime-{mime_class} file--{icon}")
}

/// Link to the file, wrapped in a `span` carrying its MIME classes
fn file_link(
    entity: &Entity,
    overrides: &Overrides,
    context: &RenderContext,
) -> Result<Handle, EmbedError> {
    let file = file_data(entity)?;
    let url = context.file_url(&file.uri);
    let type_attr = format!("{}; length={}", file.mime, file.size);
    let mut attrs = vec![("href", url.as_str()), ("type", type_attr.as_str())];
    if let Some(title) = overrides.title.as_deref() {
        attrs.push(("title", title));
    }

    let classes = file_classes(file);
    let span = create_element("span", vec![("class", &classes)]);
    append(&span, create_text_element("a", attrs, &file.filename));
    Ok(span)
}

/// Human readable file size (`512 bytes`, `1.5 KB`, `2 MB`)
pub fn format_size(size: u64) -> String {
    const UNITS: [&str; 6] = ["KB", "MB", "GB", "TB", "PB", "EB"];
    if size < 1024 {
        return if size == 1 {
            "1 byte".to_string()
        } else {
            format!("{size} bytes")
        };
    }

    let mut value = size as f64 / 1024.0;
    let mut unit = UNITS[0];
    for next in &UNITS[1..] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {unit}")
}

/// `file:file_default`
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDefault;

impl Display for FileDefault {
    fn id(&self) -> &str {
        "file:file_default"
    }

    fn label(&self) -> &str {
        "Generic file"
    }

    fn applies_to(&self, kind: &EntityKind) -> bool {
        kind.is_file()
    }

    fn render(
        &self,
        entity: &Entity,
        _settings: &Settings,
        overrides: &Overrides,
        context: &RenderContext,
    ) -> Result<Vec<Handle>, EmbedError> {
        Ok(vec![file_link(entity, overrides, context)?])
    }
}

/// `file:file_table`
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTable;

impl Display for FileTable {
    fn id(&self) -> &str {
        "file:file_table"
    }

    fn label(&self) -> &str {
        "Table of files"
    }

    fn applies_to(&self, kind: &EntityKind) -> bool {
        kind.is_file()
    }

    fn render(
        &self,
        entity: &Entity,
        _settings: &Settings,
        overrides: &Overrides,
        context: &RenderContext,
    ) -> Result<Vec<Handle>, EmbedError> {
        let size = format_size(file_data(entity)?.size);

        let table = create_element("table", vec![]);
        let thead = create_element("thead", vec![]);
        let header = create_element("tr", vec![]);
        append(&header, create_text_element("th", vec![], "Attachment"));
        append(&header, create_text_element("th", vec![], "Size"));
        append(&thead, header);
        append(&table, thead);

        let tbody = create_element("tbody", vec![]);
        let row = create_element("tr", vec![]);
        let link_cell = create_element("td", vec![]);
        append(&link_cell, file_link(entity, overrides, context)?);
        append(&row, link_cell);
        append(&row, create_text_element("td", vec![], &size));
        append(&tbody, row);
        append(&table, tbody);

        Ok(vec![table])
    }
}

/// `file:file_url_plain`
#[derive(Debug, Clone, Copy, Default)]
pub struct FileUrlPlain;

impl Display for FileUrlPlain {
    fn id(&self) -> &str {
        "file:file_url_plain"
    }

    fn label(&self) -> &str {
        "URL to file"
    }

    fn applies_to(&self, kind: &EntityKind) -> bool {
        kind.is_file()
    }

    fn render(
        &self,
        entity: &Entity,
        _settings: &Settings,
        _overrides: &Overrides,
        context: &RenderContext,
    ) -> Result<Vec<Handle>, EmbedError> {
        let file = file_data(entity)?;
        Ok(vec![create_text(&context.file_url(&file.uri))])
    }
}

/// `file:file_rss_enclosure`
///
/// Only meaningful inside a feed item, so it never applies to inline embeds.
/// It stays registered so markup naming it resolves to a known display.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileRssEnclosure;

impl Display for FileRssEnclosure {
    fn id(&self) -> &str {
        "file:file_rss_enclosure"
    }

    fn label(&self) -> &str {
        "RSS enclosure"
    }

    fn applies_to(&self, _kind: &EntityKind) -> bool {
        false
    }

    fn render(
        &self,
        entity: &Entity,
        _settings: &Settings,
        _overrides: &Overrides,
        context: &RenderContext,
    ) -> Result<Vec<Handle>, EmbedError> {
        let file = file_data(entity)?;
        let url = context.file_url(&file.uri);
        let length = file.size.to_string();
        Ok(vec![create_element(
            "enclosure",
            vec![("url", &url), ("length", &length), ("type", &file.mime)],
        )])
    }
}
