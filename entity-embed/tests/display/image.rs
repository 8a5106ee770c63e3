//! Configuration form of the image display

use crate::common::{registry, IMAGE};
use entity_embed::{EmbedError, Settings};
use serde_json::json;

#[test]
fn test_image_configuration_form() {
    let registry = registry();
    let display = registry.instantiate("image:image", &Settings::new()).unwrap();
    let form = registry.build_configuration_form(&display, &IMAGE);

    assert_eq!(form.keys(), vec!["image_style", "image_link", "alt", "title"]);

    let expected = [
        ("image_style", "select", "Image style"),
        ("image_link", "select", "Link image to"),
        ("alt", "textfield", "Alternate text"),
        ("title", "textfield", "Title"),
    ];
    for (name, field_type, title) in expected {
        let field = form.get(name).unwrap();
        assert_eq!(field.type_name(), field_type, "type of {name}");
        assert_eq!(field.title, title, "title of {name}");
    }
}

#[test]
fn test_form_json_keeps_declaration_order() {
    let registry = registry();
    let settings = json!({"image_link": "file"}).as_object().cloned().unwrap();
    let display = registry.instantiate("image:image", &settings).unwrap();
    let form = registry.build_configuration_form(&display, &IMAGE);

    let rendered = serde_json::to_string(&form).unwrap();
    let positions: Vec<_> = ["\"image_style\":{", "\"image_link\":{", "\"alt\":{", "\"title\":{"]
        .iter()
        .map(|key| rendered.find(key).unwrap())
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(value["image_link"]["default"], "file");
    assert_eq!(value["alt"]["maxlength"], 512);
    assert_eq!(value["title"]["maxlength"], 1024);
}

#[test]
fn test_instantiate_unknown_display() {
    let err = registry().instantiate("image:gallery", &Settings::new()).unwrap_err();
    assert_eq!(err, EmbedError::UnknownPlugin("image:gallery".into()));
    assert_eq!(err.to_string(), "Display plugin 'image:gallery' not found");
}

#[test]
fn test_stored_settings_are_reconciled() {
    let settings = json!({
        "image_style": "medium",
        "image_link": "nowhere",
        "legacy_option": true,
    })
    .as_object()
    .cloned()
    .unwrap();
    let display = registry().instantiate("image:image", &settings).unwrap();

    assert_eq!(
        serde_json::Value::Object(display.settings().clone()),
        json!({"image_style": "medium", "image_link": "", "alt": "", "title": ""})
    );
}
