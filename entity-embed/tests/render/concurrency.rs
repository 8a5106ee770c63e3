//! Parallel renders and registry swaps

use crate::common::{store, IMAGE, NODE};
use entity_embed::{
    DisplayRegistry, EmbedRecord, RenderContext, Renderer, SharedRegistry,
};
use std::sync::Arc;

#[test]
fn test_parallel_renders_agree() {
    let renderer = crate::common::renderer();
    let record = EmbedRecord::new("file", IMAGE.uuid, "image:image");
    let expected = renderer.render(&record);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| (0..25).map(|_| renderer.render(&record)).collect::<Vec<_>>()))
            .collect();
        for handle in handles {
            for markup in handle.join().unwrap() {
                assert_eq!(markup, expected);
            }
        }
    });
}

#[test]
fn test_swap_does_not_disturb_running_renders() {
    let shared = SharedRegistry::default();
    let repository = Arc::new(store());
    let record = EmbedRecord::new("node", NODE.uuid, "entity_reference:entity_reference_label");

    let before = Renderer::new(shared.snapshot(), repository.clone(), RenderContext::default());
    shared.swap(DisplayRegistry::new());
    let after = Renderer::new(shared.snapshot(), repository, RenderContext::default());

    assert!(before.render(&record).as_str().contains("Embedded node"));
    assert!(after.render(&record).is_empty());
}

#[test]
fn test_concurrent_readers_see_whole_registries() {
    let shared = SharedRegistry::new(DisplayRegistry::new());

    std::thread::scope(|scope| {
        let writer = scope.spawn(|| {
            for round in 0..50 {
                if round % 2 == 0 {
                    shared.swap(DisplayRegistry::with_defaults());
                } else {
                    shared.swap(DisplayRegistry::new());
                }
            }
        });
        let readers: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    for _ in 0..200 {
                        let count = shared.snapshot().list_displays().len();
                        assert!(count == 0 || count == 7, "partial registry with {count} displays");
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    });
}
