//! Configuration form schema and schema-driven settings merge
//!
//! Every display describes its settings as an ordered list of form fields.
//! The same description drives three things:
//!
//! - the configuration form shown in the embed dialog
//! - [`FormSchema::merge`]: stored settings are reconciled with the current
//!   schema (unknown keys dropped, missing or malformed values defaulted), so
//!   settings written by an older or newer display still render
//! - [`FormSchema::validate`]: values submitted through the dialog are
//!   checked field by field

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ValidationErrors;

/// Display settings, keyed by field name
pub type Settings = Map<String, Value>;

/// Kind of form element backing a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// Drop-down limited to the listed `(value, label)` options
    Select { options: Vec<(String, String)> },
    /// Free text, optionally length limited
    Textfield { max_length: Option<usize> },
    Checkbox,
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Select { .. } => "select",
            FieldType::Textfield { .. } => "textfield",
            FieldType::Checkbox => "checkbox",
        }
    }

    /// Whether `value` is acceptable for this field type
    fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (FieldType::Select { options }, Value::String(choice)) => {
                options.iter().any(|(key, _)| key == choice)
            }
            (FieldType::Textfield { .. }, Value::String(_)) => true,
            (FieldType::Checkbox, Value::Bool(_)) => true,
            _ => false,
        }
    }
}

/// A single configuration form field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    pub name: String,
    pub field_type: FieldType,
    pub title: String,
    pub default: Value,
    pub description: Option<String>,
}

impl FieldSchema {
    pub fn select(name: &str, title: &str, options: Vec<(&str, &str)>, default: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: FieldType::Select {
                options: options
                    .into_iter()
                    .map(|(key, label)| (key.to_string(), label.to_string()))
                    .collect(),
            },
            title: title.to_string(),
            default: Value::String(default.to_string()),
            description: None,
        }
    }

    pub fn textfield(name: &str, title: &str, max_length: Option<usize>) -> Self {
        Self {
            name: name.to_string(),
            field_type: FieldType::Textfield { max_length },
            title: title.to_string(),
            default: Value::String(String::new()),
            description: None,
        }
    }

    pub fn checkbox(name: &str, title: &str, default: bool) -> Self {
        Self {
            name: name.to_string(),
            field_type: FieldType::Checkbox,
            title: title.to_string(),
            default: Value::Bool(default),
            description: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.field_type.name()
    }

    /// Option labels for select fields
    pub fn options(&self) -> Option<&[(String, String)]> {
        match &self.field_type {
            FieldType::Select { options } => Some(options),
            _ => None,
        }
    }
}

impl Serialize for FieldSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.type_name())?;
        map.serialize_entry("title", &self.title)?;
        if let FieldType::Select { options } = &self.field_type {
            map.serialize_entry("options", &OrderedOptions(options))?;
        }
        if let FieldType::Textfield {
            max_length: Some(max),
        } = &self.field_type
        {
            map.serialize_entry("maxlength", max)?;
        }
        map.serialize_entry("default", &self.default)?;
        if let Some(description) = &self.description {
            map.serialize_entry("description", description)?;
        }
        map.end()
    }
}

struct OrderedOptions<'a>(&'a [(String, String)]);

impl Serialize for OrderedOptions<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, label) in self.0 {
            map.serialize_entry(key, label)?;
        }
        map.end()
    }
}

/// Ordered set of configuration form fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSchema {
    fields: Vec<FieldSchema>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: FieldSchema) -> Self {
        self.push(field);
        self
    }

    /// Add a field, replacing an existing field of the same name in place
    pub fn push(&mut self, field: FieldSchema) {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field names in declaration order
    pub fn keys(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Declared defaults for every field
    pub fn defaults(&self) -> Settings {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.default.clone()))
            .collect()
    }

    /// Reconcile stored settings with this schema.
    ///
    /// Keys the schema does not declare are dropped. Declared keys that are
    /// missing, of the wrong type, or not among a select's options take the
    /// field default.
    pub fn merge(&self, settings: &Settings) -> Settings {
        self.fields
            .iter()
            .map(|field| {
                let value = settings
                    .get(&field.name)
                    .filter(|value| field.field_type.accepts(value))
                    .cloned()
                    .unwrap_or_else(|| field.default.clone());
                (field.name.clone(), value)
            })
            .collect()
    }

    /// Copy of this schema whose defaults are taken from `settings`
    pub fn with_values(&self, settings: &Settings) -> Self {
        let merged = self.merge(settings);
        let fields = self
            .fields
            .iter()
            .map(|field| FieldSchema {
                default: merged
                    .get(&field.name)
                    .cloned()
                    .unwrap_or_else(|| field.default.clone()),
                ..field.clone()
            })
            .collect();
        Self { fields }
    }

    /// Check submitted values against the schema
    ///
    /// Unlike [`merge`](Self::merge), a bad value is reported instead of being
    /// silently replaced. Missing fields are fine; they take their default.
    pub fn validate(&self, values: &Settings) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for field in &self.fields {
            let Some(value) = values.get(&field.name) else {
                continue;
            };
            match &field.field_type {
                FieldType::Select { .. } if !field.field_type.accepts(value) => {
                    errors.add(
                        &field.name,
                        "An illegal choice has been detected. Please contact the site administrator.",
                    );
                }
                FieldType::Textfield { max_length } => match value {
                    Value::String(text) => {
                        if let Some(max) = max_length {
                            let length = text.chars().count();
                            if length > *max {
                                errors.add(
                                    &field.name,
                                    format!(
                                        "{} cannot be longer than {max} characters but is currently {length} characters long.",
                                        field.title
                                    ),
                                );
                            }
                        }
                    }
                    _ => errors.add(&field.name, format!("{} must be text.", field.title)),
                },
                FieldType::Checkbox if !field.field_type.accepts(value) => {
                    errors.add(&field.name, format!("{} must be checked or unchecked.", field.title));
                }
                _ => {}
            }
        }
        errors
    }
}

impl Serialize for FormSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(&field.name, field)?;
        }
        map.end()
    }
}

/// Read a string setting, treating anything else as empty
pub fn string_setting<'a>(settings: &'a Settings, key: &str) -> &'a str {
    settings.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Read a boolean setting
pub fn bool_setting(settings: &Settings, key: &str, default: bool) -> bool {
    settings.get(key).and_then(Value::as_bool).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> FormSchema {
        FormSchema::new()
            .field(FieldSchema::select(
                "image_link",
                "Link image to",
                vec![("", "Nothing"), ("content", "Content"), ("file", "File")],
                "",
            ))
            .field(FieldSchema::textfield("alt", "Alternate text", Some(8)))
            .field(FieldSchema::checkbox("link", "Link label to the referenced entity", true))
    }

    fn settings(value: Value) -> Settings {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_merge_fills_defaults_and_drops_unknown() {
        let merged = schema().merge(&settings(json!({
            "image_link": "file",
            "legacy_option": 3
        })));

        assert_eq!(
            Value::Object(merged),
            json!({"image_link": "file", "alt": "", "link": true})
        );
    }

    #[test]
    fn test_merge_replaces_malformed_values() {
        let merged = schema().merge(&settings(json!({
            "image_link": "somewhere",
            "alt": 42,
            "link": "yes"
        })));

        assert_eq!(
            Value::Object(merged),
            json!({"image_link": "", "alt": "", "link": true})
        );
    }

    #[test]
    fn test_validate_reports_field_errors() {
        let errors = schema().validate(&settings(json!({
            "image_link": "somewhere",
            "alt": "far too long"
        })));

        assert_eq!(errors.len(), 2);
        assert!(errors.get("image_link").unwrap().starts_with("An illegal choice"));
        assert_eq!(
            errors.get("alt"),
            Some("Alternate text cannot be longer than 8 characters but is currently 12 characters long.")
        );
    }

    #[test]
    fn test_validate_accepts_missing_fields() {
        assert!(schema().validate(&Settings::new()).is_empty());
    }

    #[test]
    fn test_with_values_sets_form_defaults() {
        let form = schema().with_values(&settings(json!({"image_link": "content"})));
        assert_eq!(form.get("image_link").unwrap().default, json!("content"));
        assert_eq!(form.keys(), vec!["image_link", "alt", "link"]);
    }

    #[test]
    fn test_schema_serializes_in_declaration_order() {
        let json = serde_json::to_string(&schema()).unwrap();
        assert_eq!(
            json,
            r#"{"image_link":{"type":"select","title":"Link image to","options":{"":"Nothing","content":"Content","file":"File"},"default":""},"alt":{"type":"textfield","title":"Alternate text","maxlength":8,"default":""},"link":{"type":"checkbox","title":"Link label to the referenced entity","default":true}}"#
        );
    }

    #[test]
    fn test_push_replaces_existing_field() {
        let mut form = schema();
        form.push(FieldSchema::textfield("alt", "Alt", None));
        assert_eq!(form.keys(), vec!["image_link", "alt", "link"]);
        assert_eq!(form.get("alt").unwrap().title, "Alt");
    }
}
