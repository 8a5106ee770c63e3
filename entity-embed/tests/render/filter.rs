//! Embed filter over whole field values

use crate::common::{placeholder, renderer, IMAGE, IMAGE_UUID, NODE, TEXT_FILE};
use entity_embed::{EmbedFilter, EmbedRecord, Overrides};
use insta::assert_snapshot;
use once_cell::sync::Lazy;
use regex::Regex;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)placeholder").unwrap());

fn filter() -> EmbedFilter {
    EmbedFilter::new(renderer())
}

#[test]
fn test_image_embed_with_overrides() {
    let content = placeholder(
        &IMAGE,
        "image:image",
        " data-entity-embed-settings='{\"image_link\":\"file\"}' alt=\"This is sample description\" title=\"This is sample title\"",
        "This placeholder should not be rendered.",
    );
    let result = filter().process(&content).unwrap();

    assert_eq!(result.embedded, 1);
    assert!(result.html.contains("alt=\"This is sample description\""));
    assert!(result.html.contains("title=\"This is sample title\""));
    assert!(result
        .html
        .contains("<a href=\"http://localhost/sites/default/files/image-test.png\"><img "));
    assert!(!PLACEHOLDER.is_match(&result.html));
}

#[test]
fn test_three_entity_kinds_in_one_field() {
    let content = [
        placeholder(&NODE, "entity_reference:entity_reference_label", "", ""),
        placeholder(&TEXT_FILE, "file:file_default", "", ""),
        placeholder(&IMAGE, "image:image", "", ""),
    ]
    .concat();
    let result = filter().process(&content).unwrap();

    assert_eq!(result.embedded, 3);
    assert_eq!(result.omitted, 0);
    assert_snapshot!(
        result.html,
        @r#"<div class="embedded-entity" data-entity-type="node" data-entity-uuid="3f2504e0-4f89-41d3-9a0c-0305e82c3301" data-entity-embed-display="entity_reference:entity_reference_label"><a href="/node/1">Embedded node</a></div><div class="embedded-entity" data-entity-type="file" data-entity-uuid="3f2504e0-4f89-41d3-9a0c-0305e82c3302" data-entity-embed-display="file:file_default"><span class="file file--mime-text-plain file--text"><a href="http://localhost/sites/default/files/text-1.txt" type="text/plain; length=0">text-1.txt</a></span></div><div class="embedded-entity" data-entity-type="file" data-entity-uuid="3f2504e0-4f89-41d3-9a0c-0305e82c3303" data-entity-embed-display="image:image"><img src="http://localhost/sites/default/files/image-test.png" alt=""></div>"#
    );
}

#[test]
fn test_article_fixture() {
    let source = include_str!("fixtures/article.html");
    let result = filter().process(source.trim_end()).unwrap();

    assert_eq!(result.embedded, 2);
    assert_eq!(result.omitted, 1);
    assert!(result.html.starts_with("<h2>Field trip</h2><p>Pictures from the day:</p>"));
    assert!(result.html.contains(
        "<img src=\"http://localhost/sites/default/files/styles/medium/public/image-test.png\" alt=\"Group photo\">"
    ));
    assert!(result.html.contains("http://localhost/sites/default/files/text-1.txt"));
    assert!(!PLACEHOLDER.is_match(&result.html));
}

#[test]
fn test_filtering_rendered_output_is_stable() {
    let content = placeholder(&IMAGE, "image:image", " alt=\"Alt\"", "Placeholder");
    let filter = filter();

    let once = filter.process(&content).unwrap();
    let twice = filter.process(&once.html).unwrap();
    assert_eq!(twice.embedded, 1);
    // The wrapper carries no overrides, so only the display defaults remain
    assert!(twice.html.contains("alt=\"\""));
    assert_eq!(filter.process(&twice.html).unwrap().html, twice.html);
}

#[test]
fn test_render_twice_is_identical() {
    let renderer = renderer();
    let record = EmbedRecord::new("file", IMAGE.uuid, "image:image")
        .with_overrides(Overrides::new(Some("Alt".into()), None));
    assert_eq!(renderer.render(&record), renderer.render(&record));
}

#[test]
fn test_deleted_entity_is_dropped_with_its_placeholder() {
    let content = format!(
        "<p>Before</p>{}<p>After</p>",
        placeholder(&IMAGE, "image:image", "", "Placeholder").replace(IMAGE_UUID, "00000000-0000-4000-8000-000000000001")
    );
    let result = filter().process(&content).unwrap();

    assert_eq!(result.html, "<p>Before</p><p>After</p>");
    assert_eq!(result.omitted, 1);
}

#[test]
fn test_unknown_display_is_dropped() {
    let content = placeholder(&IMAGE, "image:gallery", "", "Placeholder");
    let result = filter().process(&content).unwrap();
    assert_eq!(result.html, "");
    assert_eq!(result.omitted, 1);
}

#[test]
fn test_malformed_settings_render_with_defaults() {
    let content = placeholder(
        &IMAGE,
        "image:image",
        " data-entity-embed-settings='{\"image_link\": '",
        "Placeholder",
    );
    let result = filter().process(&content).unwrap();
    assert_eq!(result.embedded, 1);
    assert!(result.html.contains("<img src=\"http://localhost/sites/default/files/image-test.png\" alt=\"\">"));
}
