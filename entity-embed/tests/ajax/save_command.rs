//! The save command carries its payload untouched

use entity_embed::{AjaxCommand, AjaxResponse, CloseDialog, SelectDialogSave};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z0-9 <>&\"']{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z-]{1,10}", inner, 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

proptest! {
    #[test]
    fn save_command_is_opaque(values in json_value()) {
        let rendered = SelectDialogSave::new(values.clone()).render();
        let object = rendered.as_object().unwrap();

        prop_assert_eq!(object.len(), 2);
        prop_assert_eq!(&object["command"], &json!("entityembedSelectDialogSave"));
        prop_assert_eq!(&object["values"], &values);
    }

    #[test]
    fn save_command_survives_the_wire(values in json_value()) {
        let mut response = AjaxResponse::new();
        response.add_command(SelectDialogSave::new(values.clone()));
        let decoded: Value = serde_json::from_str(&response.to_json_string()).unwrap();
        prop_assert_eq!(&decoded[0]["values"], &values);
    }
}

#[test]
fn test_nested_payload() {
    let values = json!({
        "attributes": {
            "data-entity-type": "file",
            "data-entity-embed-settings": "{\"image_link\":\"file\"}",
        },
        "extra": [1, [2, [3]], {"deep": null}],
    });
    assert_eq!(SelectDialogSave::new(values.clone()).values(), &values);
    assert_eq!(SelectDialogSave::new(values.clone()).render()["values"], values);
}

#[test]
fn test_dialog_response_order() {
    let mut response = AjaxResponse::new();
    response
        .add_command(SelectDialogSave::new(json!({})))
        .add_command(CloseDialog::default());

    let commands: Vec<_> = response
        .render()
        .as_array()
        .unwrap()
        .iter()
        .map(|command| command["command"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(commands, vec!["entityembedSelectDialogSave", "closeDialog"]);
}
