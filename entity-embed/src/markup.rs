//! Markup building blocks
//!
//! Displays build their output as `markup5ever_rcdom` nodes rather than
//! concatenated strings, so escaping is handled by the html5ever serializer and
//! the embed filter can splice rendered nodes straight into the parsed
//! document.

use html5ever::tendril::TendrilSink;
use html5ever::{
    local_name, ns, parse_fragment as parse_html_fragment, serialize, serialize::SerializeOpts,
    serialize::TraversalScope, Attribute, LocalName, QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::EmbedError;

/// Rendered embed output, serialized to HTML
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    pub fn new(html: impl Into<String>) -> Self {
        Markup(html.into())
    }

    pub fn empty() -> Self {
        Markup(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Serialize a list of nodes
    pub fn from_nodes(nodes: &[Handle]) -> Result<Self, EmbedError> {
        serialize_nodes(nodes).map(Markup)
    }
}

impl std::fmt::Display for Markup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Create an HTML element with attributes
pub fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

/// Create a text node
pub fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

/// Append `child` to `parent`
pub fn append(parent: &Handle, child: Handle) {
    parent.children.borrow_mut().push(child);
}

/// Create an element holding a single text node
pub fn create_text_element(tag: &str, attrs: Vec<(&str, &str)>, text: &str) -> Handle {
    let element = create_element(tag, attrs);
    append(&element, create_text(text));
    element
}

/// Local tag name of an element node
pub fn tag_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

/// Value of attribute `name` on an element node
pub fn attribute(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// All attributes of an element node, in document order
pub fn attributes(node: &Handle) -> Vec<(String, String)> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect(),
        _ => Vec::new(),
    }
}

/// Parse an HTML fragment as `<body>` content into its top-level nodes
///
/// The nodes are detached from the parsed document before it is dropped:
/// dropping an `RcDom` clears the children of every node it still holds.
pub fn parse_fragment(html: &str) -> Vec<Handle> {
    let context = QualName::new(None, ns!(html), local_name!("body"));
    let dom = parse_html_fragment(RcDom::default(), Default::default(), context, Vec::new(), false)
        .one(html);
    // The fragment parser puts its nodes under a synthetic <html> root
    let root = dom.document.children.borrow().first().cloned();
    match root {
        Some(root) => root.children.take(),
        None => Vec::new(),
    }
}

/// Depth-first search for the first element with the given tag
pub fn find_element(node: &Handle, tag: &str) -> Option<Handle> {
    if tag_name(node).as_deref() == Some(tag) {
        return Some(node.clone());
    }
    node.children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

/// Concatenated text content of a node and its descendants
pub fn text_content(node: &Handle) -> String {
    let mut output = String::new();
    collect_text(node, &mut output);
    output
}

fn collect_text(node: &Handle, output: &mut String) {
    if let NodeData::Text { contents } = &node.data {
        output.push_str(&contents.borrow());
    }
    for child in node.children.borrow().iter() {
        collect_text(child, output);
    }
}

/// Serialize nodes (and their subtrees) to an HTML string
pub fn serialize_nodes(nodes: &[Handle]) -> Result<String, EmbedError> {
    let mut output = Vec::new();

    // Use TraversalScope::IncludeNode to serialize the element AND its children
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    for node in nodes {
        let serializable = SerializableHandle::from(node.clone());
        serialize(&mut output, &serializable, opts.clone())
            .map_err(|e| EmbedError::Markup(format!("HTML serialization failed: {e}")))?;
    }

    String::from_utf8(output)
        .map_err(|e| EmbedError::Markup(format!("UTF-8 conversion failed: {e}")))
}
