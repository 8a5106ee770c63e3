//! Inline entity embeds for rich-text content
//!
//!     This crate lets editors place references to other entities (content, files, images) inside
//!     rich-text fields, and turns those references into final markup when the field is shown.
//!
//!     TLDR:
//!         - An embed lives in the field value as a placeholder element carrying data-entity-*
//!           attributes (see ./record.rs). That element is the only thing ever persisted.
//!         - Displays (./display) turn an entity plus settings into markup. The registry
//!           (./registry.rs) knows every display and which ones fit a given entity.
//!         - Editors build embeds through the selection dialog (./dialog.rs), which hands the result
//!           to the client with a one-way AJAX command (./ajax.rs).
//!         - Readers get the markup through the renderer (./render.rs), usually driven by the embed
//!           filter (./filter.rs) over a whole field value.
//!
//!     This is a pure lib: it powers the entity-embed cli but is shell agnostic. No code here
//!     prints, reads env vars or touches files.
//!
//! Architecture
//!
//!     .
//!     ├── error.rs                # EmbedError, field-level ValidationErrors
//!     ├── entity.rs               # Entity model and the EntityRepository seam
//!     ├── context.rs              # RenderContext: file urls, wrapper class
//!     ├── markup.rs               # html5ever helpers, Markup output type
//!     ├── display
//!     │   ├── mod.rs              # Display trait, DisplayInstance, Overrides
//!     │   ├── schema.rs           # Settings schema: defaults, merge, validation
//!     │   ├── entity_reference.rs
//!     │   ├── file.rs
//!     │   └── image.rs
//!     ├── registry.rs             # DisplayRegistry, SharedRegistry
//!     ├── record.rs               # EmbedRecord <-> placeholder attributes
//!     ├── dialog.rs               # SelectDialog state machine
//!     ├── ajax.rs                 # AjaxCommand, SelectDialogSave, AjaxResponse
//!     ├── render.rs               # Renderer
//!     └── filter.rs               # EmbedFilter over whole field values
//!
//! Failure model
//!
//!     The two paths fail differently. The dialog is interactive, so every problem (missing
//!     entity, unknown or unfit display, invalid settings) is returned to the editor as an
//!     EmbedError. Rendering happens long after the embed was written: the entity may be gone or
//!     the display uninstalled. The renderer never fails the page for that, it drops the embed and
//!     logs a warning. Settings follow the same rule: stored settings are reconciled with the
//!     display's schema, so unknown keys are ignored and missing or broken ones take defaults.
//!
//! Concurrency
//!
//!     A DisplayRegistry is built once and then only read, so renders share it through an Arc
//!     without locking. Picking up new displays means building a new registry and swapping it in
//!     whole through SharedRegistry. A SelectDialog belongs to one editing session and is never
//!     shared.
//!
//! Library Choices
//!
//!     Markup is parsed and serialized with html5ever/markup5ever_rcdom, displays build nodes and
//!     leave escaping to the serializer. Settings and wire messages are serde_json values.
//!     Registry swaps use arc-swap.
//!
pub mod ajax;
pub mod context;
pub mod dialog;
pub mod display;
pub mod entity;
pub mod error;
pub mod filter;
pub mod markup;
pub mod record;
pub mod registry;
pub mod render;

pub use ajax::{AjaxCommand, AjaxResponse, CloseDialog, SelectDialogSave};
pub use context::RenderContext;
pub use dialog::{DialogStep, SelectDialog};
pub use display::{Display, DisplayInstance, FormSchema, Overrides, Settings};
pub use entity::{Entity, EntityKind, EntityRepository, InMemoryEntityStore};
pub use error::{EmbedError, ValidationErrors};
pub use filter::{EmbedFilter, FilterResult};
pub use markup::Markup;
pub use record::{EmbedRecord, EntityReference};
pub use registry::{DisplayRegistry, SharedRegistry};
pub use render::Renderer;
