//! Rendering of committed embed records
//!
//! Rendering happens while a reader views a page, long after the editor
//! committed the embed. The entity may have been deleted since, or the display
//! uninstalled, so [`Renderer::render`] never fails: anything that goes wrong
//! produces empty output and a `warn!` log line. [`Renderer::try_render`]
//! exposes the underlying error for tooling.
//!
//! Pipeline: record → entity → display instance → nodes → wrapper element

use markup5ever_rcdom::Handle;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::context::RenderContext;
use crate::entity::{Entity, EntityRepository};
use crate::error::EmbedError;
use crate::markup::{append, create_element, Markup};
use crate::record::{
    EmbedRecord, EntityReference, ATTR_DISPLAY, ATTR_ENTITY_TYPE, ATTR_ENTITY_UUID,
};
use crate::registry::DisplayRegistry;

/// Renders embed records against an immutable registry snapshot
#[derive(Clone)]
pub struct Renderer {
    registry: Arc<DisplayRegistry>,
    repository: Arc<dyn EntityRepository>,
    context: RenderContext,
}

impl Renderer {
    pub fn new(
        registry: Arc<DisplayRegistry>,
        repository: Arc<dyn EntityRepository>,
        context: RenderContext,
    ) -> Self {
        Self {
            registry,
            repository,
            context,
        }
    }

    pub fn registry(&self) -> &DisplayRegistry {
        &self.registry
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Resolve the entity a record points at
    pub fn resolve(&self, record: &EmbedRecord) -> Result<Entity, EmbedError> {
        let entity = match &record.entity_reference {
            EntityReference::Uuid(uuid) => self.repository.load_by_uuid(&record.entity_type, uuid),
            EntityReference::Id(id) => self.repository.load(&record.entity_type, *id),
        };
        entity.ok_or_else(|| EmbedError::EntityResolution {
            entity_type: record.entity_type.clone(),
            reference: record.entity_reference.to_string(),
        })
    }

    /// Render a record to nodes, reporting why it could not be rendered
    pub fn try_render_nodes(&self, record: &EmbedRecord) -> Result<Vec<Handle>, EmbedError> {
        let entity = self.resolve(record)?;
        let instance = self.registry.instantiate_for(
            &record.display_plugin_id,
            &record.display_settings,
            &entity,
        )?;
        debug!(
            display = %record.display_plugin_id,
            entity_type = %entity.entity_type,
            entity_id = entity.id,
            "rendering embed"
        );

        let nodes = instance.render_nodes(&entity, &record.overrides, &self.context)?;
        Ok(vec![self.wrap(record, &entity, nodes)])
    }

    /// Render a record, reporting why it could not be rendered
    pub fn try_render(&self, record: &EmbedRecord) -> Result<Markup, EmbedError> {
        let nodes = self.try_render_nodes(record)?;
        Markup::from_nodes(&nodes)
    }

    /// Render a record to nodes; empty when it cannot be rendered
    pub fn render_nodes(&self, record: &EmbedRecord) -> Vec<Handle> {
        match self.try_render_nodes(record) {
            Ok(nodes) => nodes,
            Err(e) => {
                log_omitted(record, &e);
                Vec::new()
            }
        }
    }

    /// Render a record; empty when it cannot be rendered
    pub fn render(&self, record: &EmbedRecord) -> Markup {
        match self.try_render(record) {
            Ok(markup) => markup,
            Err(e) => {
                log_omitted(record, &e);
                Markup::empty()
            }
        }
    }

    fn wrap(&self, record: &EmbedRecord, entity: &Entity, nodes: Vec<Handle>) -> Handle {
        let uuid = entity.uuid.to_string();
        let wrapper = create_element(
            "div",
            vec![
                ("class", self.context.wrapper_class()),
                (ATTR_ENTITY_TYPE, &entity.entity_type),
                (ATTR_ENTITY_UUID, &uuid),
                (ATTR_DISPLAY, &record.display_plugin_id),
            ],
        );
        for node in nodes {
            append(&wrapper, node);
        }
        wrapper
    }
}

fn log_omitted(record: &EmbedRecord, error: &EmbedError) {
    if error.is_soft() {
        warn!(
            entity_type = %record.entity_type,
            reference = %record.entity_reference,
            display = %record.display_plugin_id,
            error = %error,
            "embed omitted from output"
        );
    } else {
        error!(
            entity_type = %record.entity_type,
            reference = %record.entity_reference,
            display = %record.display_plugin_id,
            error = %error,
            "embed omitted from output, display failed"
        );
    }
}
