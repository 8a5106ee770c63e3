//! Full dialog sessions, from entity pick to the save command

use crate::common::{registry, renderer, store, IMAGE, NODE, TEXT_FILE};
use entity_embed::{
    DialogStep, EmbedError, EmbedRecord, Overrides, SelectDialog, Settings,
};
use serde_json::{json, Value};
use std::sync::Arc;

fn dialog() -> SelectDialog {
    SelectDialog::new(registry(), Arc::new(store()))
}

fn settings(value: Value) -> Settings {
    value.as_object().cloned().unwrap()
}

/// Rebuild the embed record the client would write from the saved attributes
fn record_from_save(values: &Value) -> EmbedRecord {
    let attributes = values["attributes"].as_object().unwrap();
    EmbedRecord::from_attributes(
        attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str().unwrap())),
    )
    .unwrap()
}

#[test]
fn test_committed_embed_renders_like_the_dialog_configured_it() {
    let mut dialog = dialog();
    dialog.select_entity("file", &IMAGE.uuid).unwrap();
    dialog.select_display("image:image").unwrap();
    dialog
        .configure(
            &settings(json!({"image_link": "file"})),
            Overrides::new(Some("This is sample description".into()), None),
        )
        .unwrap();

    let response = dialog.commit().unwrap().render();
    assert_eq!(response.as_array().unwrap().len(), 2);
    let record = record_from_save(&response[0]["values"]);
    assert_eq!(&record, dialog.record().unwrap());

    let html = renderer().render(&record);
    assert!(html
        .as_str()
        .contains("<a href=\"http://localhost/sites/default/files/image-test.png\"><img "));
    assert!(html.as_str().contains("alt=\"This is sample description\""));
}

#[test]
fn test_switching_entities_keeps_compatible_settings() {
    let mut dialog = dialog();
    dialog.select_entity("file", &IMAGE.uuid).unwrap();
    dialog.select_display("file:file_table").unwrap();
    dialog.back().unwrap();
    dialog.back().unwrap();
    assert_eq!(dialog.step(), DialogStep::PickingEntity);

    dialog.select_entity("file", &TEXT_FILE.uuid).unwrap();
    assert_eq!(dialog.display_id(), Some("file:file_table"));

    dialog.back().unwrap();
    dialog.select_entity("node", &NODE.uuid).unwrap();
    assert_eq!(dialog.display_id(), None);
    assert!(!dialog.display_options().unwrap().contains_key("file:file_table"));
}

#[test]
fn test_commit_requires_configuration_step() {
    let mut dialog = dialog();
    let err = dialog.commit().unwrap_err();
    assert_eq!(
        err,
        EmbedError::DialogState {
            action: "commit",
            step: "picking an entity",
        }
    );

    dialog.select_entity("node", &NODE.uuid).unwrap();
    assert!(matches!(dialog.configuration_form(), Err(EmbedError::DialogState { .. })));
}

#[test]
fn test_title_override_length_is_checked() {
    let mut dialog = dialog();
    dialog.select_entity("file", &IMAGE.uuid).unwrap();
    dialog.select_display("image:image").unwrap();

    let err = dialog
        .configure(&Settings::new(), Overrides::new(None, Some("t".repeat(1025))))
        .unwrap_err();
    let EmbedError::Validation(errors) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(
        errors.get("title"),
        Some("Title cannot be longer than 1024 characters but is currently 1025 characters long.")
    );

    dialog
        .configure(&Settings::new(), Overrides::new(None, Some("t".repeat(1024))))
        .unwrap();
    assert!(dialog.commit().is_ok());
}

#[test]
fn test_reopening_an_embed() {
    let record = EmbedRecord::new("node", NODE.uuid, "entity_reference:entity_reference_label")
        .with_settings(settings(json!({"link": false})));

    let mut dialog = SelectDialog::edit(registry(), Arc::new(store()), &record).unwrap();
    assert_eq!(dialog.step(), DialogStep::ConfiguringDisplay);
    let form = dialog.configuration_form().unwrap();
    assert_eq!(form.get("link").unwrap().default, json!(false));

    dialog.commit().unwrap();
    assert_eq!(dialog.record().unwrap(), &record);
}

#[test]
fn test_reopening_an_embed_of_a_deleted_entity() {
    let mut store = store();
    store.remove("node", &NODE.uuid);
    let record = EmbedRecord::new("node", NODE.uuid, "entity_reference:entity_reference_label");

    let err = SelectDialog::edit(registry(), Arc::new(store), &record)
        .err()
        .unwrap();
    assert!(matches!(err, EmbedError::EntityResolution { .. }));
}
