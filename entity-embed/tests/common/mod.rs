//! Shared fixtures: one image, one text file and one node with fixed uuids

use entity_embed::{DisplayRegistry, Entity, InMemoryEntityStore, RenderContext, Renderer};
use once_cell::sync::Lazy;
use std::sync::Arc;
use uuid::Uuid;

pub const IMAGE_UUID: &str = "3f2504e0-4f89-41d3-9a0c-0305e82c3303";
pub const TEXT_UUID: &str = "3f2504e0-4f89-41d3-9a0c-0305e82c3302";
pub const NODE_UUID: &str = "3f2504e0-4f89-41d3-9a0c-0305e82c3301";

pub static IMAGE: Lazy<Entity> = Lazy::new(|| {
    Entity::file(1, "public://image-test.png", "image/png")
        .with_uuid(uuid(IMAGE_UUID))
        .with_size(4096)
});

pub static TEXT_FILE: Lazy<Entity> = Lazy::new(|| {
    Entity::file(2, "public://text-1.txt", "text/plain").with_uuid(uuid(TEXT_UUID))
});

pub static NODE: Lazy<Entity> =
    Lazy::new(|| Entity::new("node", 1, "page", "Embedded node").with_uuid(uuid(NODE_UUID)));

pub fn uuid(value: &str) -> Uuid {
    Uuid::parse_str(value).unwrap()
}

pub fn store() -> InMemoryEntityStore {
    [IMAGE.clone(), TEXT_FILE.clone(), NODE.clone()]
        .into_iter()
        .collect()
}

pub fn registry() -> Arc<DisplayRegistry> {
    Arc::new(DisplayRegistry::with_defaults())
}

pub fn renderer() -> Renderer {
    Renderer::new(registry(), Arc::new(store()), RenderContext::default())
}

/// Placeholder element as an editor would store it
pub fn placeholder(entity: &Entity, display: &str, extra: &str, inner: &str) -> String {
    format!(
        "<div data-entity-type=\"{}\" data-entity-uuid=\"{}\" data-entity-embed-display=\"{display}\"{extra}>{inner}</div>",
        entity.entity_type, entity.uuid
    )
}
