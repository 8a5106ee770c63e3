//! AJAX commands sent to the editor client
//!
//! Commands are one-way: the server renders them into the response and never
//! learns whether the client acted on them. The client dispatches each command
//! to the handler registered under its `command` name.

use serde_json::{json, Value};

/// Name of the client handler committing an embed
pub const SELECT_DIALOG_SAVE: &str = "entityembedSelectDialogSave";

/// Selector of the modal embed dialog
pub const DIALOG_SELECTOR: &str = "#entity-embed-dialog";

/// A command rendered into an AJAX response
pub trait AjaxCommand: Send {
    /// Wire representation of the command
    fn render(&self) -> Value;
}

/// Hands the dialog's values back to the editor, which commits the embed
///
/// The values are an opaque payload: they are carried as given, without
/// inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectDialogSave {
    values: Value,
}

impl SelectDialogSave {
    pub fn new(values: Value) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &Value {
        &self.values
    }
}

impl AjaxCommand for SelectDialogSave {
    fn render(&self) -> Value {
        json!({
            "command": SELECT_DIALOG_SAVE,
            "values": self.values,
        })
    }
}

/// Closes a dialog on the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseDialog {
    selector: String,
    persist: bool,
}

impl CloseDialog {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            persist: false,
        }
    }

    /// Keep the dialog element in the page after closing
    pub fn persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }
}

impl Default for CloseDialog {
    fn default() -> Self {
        Self::new(DIALOG_SELECTOR)
    }
}

impl AjaxCommand for CloseDialog {
    fn render(&self) -> Value {
        json!({
            "command": "closeDialog",
            "selector": self.selector,
            "persist": self.persist,
        })
    }
}

/// Ordered list of commands making up one AJAX response
#[derive(Default)]
pub struct AjaxResponse {
    commands: Vec<Box<dyn AjaxCommand>>,
}

impl std::fmt::Debug for AjaxResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.commands.iter().map(|command| command.render()))
            .finish()
    }
}

impl AjaxResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command<C: AjaxCommand + 'static>(&mut self, command: C) -> &mut Self {
        self.commands.push(Box::new(command));
        self
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Rendered commands, in the order they were added
    pub fn render(&self) -> Value {
        Value::Array(self.commands.iter().map(|command| command.render()).collect())
    }

    pub fn to_json_string(&self) -> String {
        self.render().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_command_wire_format() {
        let command = SelectDialogSave::new(json!({"attributes": {"data-entity-type": "node"}}));
        assert_eq!(
            command.render(),
            json!({
                "command": "entityembedSelectDialogSave",
                "values": {"attributes": {"data-entity-type": "node"}}
            })
        );
    }

    #[test]
    fn test_save_command_carries_empty_payload() {
        assert_eq!(
            SelectDialogSave::new(Value::Null).render(),
            json!({"command": "entityembedSelectDialogSave", "values": null})
        );
        assert_eq!(
            SelectDialogSave::new(json!({})).render()["values"],
            json!({})
        );
    }

    #[test]
    fn test_close_dialog() {
        assert_eq!(
            CloseDialog::default().render(),
            json!({"command": "closeDialog", "selector": "#entity-embed-dialog", "persist": false})
        );
        assert_eq!(CloseDialog::new("#x").persist(true).render()["persist"], json!(true));
    }

    #[test]
    fn test_response_keeps_command_order() {
        let mut response = AjaxResponse::new();
        response
            .add_command(SelectDialogSave::new(json!("v")))
            .add_command(CloseDialog::default());

        assert_eq!(response.len(), 2);
        let rendered = response.render();
        assert_eq!(rendered[0]["command"], "entityembedSelectDialogSave");
        assert_eq!(rendered[1]["command"], "closeDialog");
        assert_eq!(
            serde_json::from_str::<Value>(&response.to_json_string()).unwrap(),
            rendered
        );
    }
}
