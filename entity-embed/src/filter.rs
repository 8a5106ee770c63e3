//! Embed filter for rich-text fields
//!
//! Parses a stored field value with html5ever, replaces every embed
//! placeholder with the output of its display and serializes the result.
//! Placeholders that cannot be rendered are dropped, together with their
//! placeholder text; everything else in the field is kept as parsed.

use markup5ever_rcdom::Handle;
use tracing::{debug, warn};

use crate::error::EmbedError;
use crate::markup::{attributes, parse_fragment, serialize_nodes};
use crate::record::EmbedRecord;
use crate::render::Renderer;

/// Outcome of filtering one field value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterResult {
    pub html: String,
    /// Placeholders replaced with rendered output
    pub embedded: usize,
    /// Placeholders removed because they could not be rendered
    pub omitted: usize,
}

pub struct EmbedFilter {
    renderer: Renderer,
}

impl EmbedFilter {
    pub fn new(renderer: Renderer) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Replace every embed placeholder in `html`
    pub fn process(&self, html: &str) -> Result<FilterResult, EmbedError> {
        let mut result = FilterResult::default();
        let nodes = self.replace_all(parse_fragment(html), &mut result);
        result.html = serialize_nodes(&nodes)?;
        debug!(
            embedded = result.embedded,
            omitted = result.omitted,
            "embed filter done"
        );
        Ok(result)
    }

    /// Like [`process`](Self::process), but never fails: on a serialization
    /// error the field value is returned unchanged.
    pub fn process_text(&self, html: &str) -> String {
        match self.process(html) {
            Ok(result) => result.html,
            Err(e) => {
                warn!(error = %e, "embed filter failed, returning field value unchanged");
                html.to_string()
            }
        }
    }

    fn process_children(&self, node: &Handle, result: &mut FilterResult) {
        let children = node.children.take();
        let children = self.replace_all(children, result);
        *node.children.borrow_mut() = children;
    }

    /// Swap placeholders in a sibling list for their rendered nodes
    ///
    /// Only nodes kept from the field value are descended into, rendered
    /// output is spliced in as is.
    fn replace_all(&self, nodes: Vec<Handle>, result: &mut FilterResult) -> Vec<Handle> {
        let mut output = Vec::with_capacity(nodes.len());
        for node in nodes {
            match self.placeholder_record(&node) {
                None => {
                    self.process_children(&node, result);
                    output.push(node);
                }
                Some(Ok(record)) => {
                    let rendered = self.renderer.render_nodes(&record);
                    if rendered.is_empty() {
                        result.omitted += 1;
                    } else {
                        result.embedded += 1;
                        output.extend(rendered);
                    }
                }
                Some(Err(e)) => {
                    warn!(error = %e, "invalid embed placeholder removed");
                    result.omitted += 1;
                }
            }
        }
        output
    }

    fn placeholder_record(&self, node: &Handle) -> Option<Result<EmbedRecord, EmbedError>> {
        let attrs = attributes(node);
        let pairs = || attrs.iter().map(|(name, value)| (name.as_str(), value.as_str()));
        if !EmbedRecord::is_embed(pairs()) {
            return None;
        }
        Some(EmbedRecord::from_attributes(pairs()))
    }
}
