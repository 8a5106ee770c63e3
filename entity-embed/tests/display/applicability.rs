//! Which displays are offered for which entities

use crate::common::{registry, IMAGE, NODE, TEXT_FILE};
use entity_embed::{DisplayRegistry, EmbedError, Settings};

#[test]
fn test_image_plugin_offered_for_images_only() {
    let registry = registry();

    let options = registry.definition_options_for_entity(&IMAGE);
    assert!(options.contains_key("image:image"), "The 'Image' plugin is available.");

    let options = registry.definition_options_for_entity(&TEXT_FILE);
    assert!(
        !options.contains_key("image:image"),
        "The 'Image' plugin is not available for text file."
    );
}

#[test]
fn test_file_plugins_offered_for_every_file() {
    let registry = registry();
    for entity in [&*IMAGE, &*TEXT_FILE] {
        let options = registry.definition_options_for_entity(entity);
        assert_eq!(options.get("file:file_table").map(String::as_str), Some("Table of files"));
        assert_eq!(options.get("file:file_default").map(String::as_str), Some("Generic file"));
        assert_eq!(options.get("file:file_url_plain").map(String::as_str), Some("URL to file"));
        assert!(!options.contains_key("file:file_rss_enclosure"));
    }
}

#[test]
fn test_node_gets_reference_displays() {
    let options = registry().definition_options_for_entity(&NODE);
    let ids: Vec<_> = options.keys().map(String::as_str).collect();
    assert_eq!(
        ids,
        vec![
            "entity_reference:entity_reference_entity_id",
            "entity_reference:entity_reference_label",
        ]
    );
}

#[test]
fn test_applicable_listing_is_ordered_and_stable() {
    let registry = registry();
    let first: Vec<_> = registry.list_applicable(&IMAGE).iter().map(|d| d.id().to_string()).collect();
    let second: Vec<_> = registry.list_applicable(&IMAGE).iter().map(|d| d.id().to_string()).collect();
    assert_eq!(first, second);

    let mut sorted = first.clone();
    sorted.sort();
    assert_eq!(first, sorted);
}

#[test]
fn test_rss_enclosure_is_registered_but_never_offered() {
    let registry = DisplayRegistry::default();
    assert!(registry.has("file:file_rss_enclosure"));
    let err = registry
        .instantiate_for("file:file_rss_enclosure", &Settings::new(), &IMAGE)
        .unwrap_err();
    assert!(matches!(err, EmbedError::InapplicablePlugin { .. }));
}
