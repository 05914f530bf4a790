//! Sync emitter: serializes the current boxes to the host.

use bbox_core::{BoxStore, HostResult, RectRecord};
use bbox_render::Surface;

/// The embedding application's side of the exchange.
pub trait HostBridge {
    /// Receive the full, ordered list of boxes.
    fn set_component_value(&mut self, value: &HostResult);
    /// Receive the rendered height so the embedding frame can be sized.
    fn set_frame_height(&mut self, height: f64);
}

/// Builds and pushes `HostResult`s. Stateless apart from a counter.
#[derive(Debug, Default)]
pub struct SyncEmitter {
    emitted: u64,
}

impl SyncEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair each live shape's bounds with its stored label.
    ///
    /// Shapes may have been moved interactively, so geometry comes from the
    /// surface. A box with no shape (should not happen) falls back to its
    /// stored geometry.
    pub fn collect(store: &BoxStore, surface: &Surface) -> HostResult {
        if store.len() != surface.len() {
            log::warn!(
                "store/surface mismatch: {} boxes, {} shapes",
                store.len(),
                surface.len()
            );
        }
        let rects = store
            .iter()
            .enumerate()
            .map(|(i, b)| {
                let bounds = surface.shape_bounds(i).unwrap_or(b.bounds);
                RectRecord {
                    top: bounds.top,
                    left: bounds.left,
                    width: bounds.width,
                    height: bounds.height,
                    label: b.label.clone(),
                }
            })
            .collect();
        HostResult { rects }
    }

    /// Collect and push the complete list to `host`.
    pub fn emit<H: HostBridge + ?Sized>(
        &mut self,
        store: &BoxStore,
        surface: &Surface,
        host: &mut H,
    ) -> HostResult {
        let result = Self::collect(store, surface);
        self.emitted += 1;
        log::debug!("emit #{}: {} rects", self.emitted, result.rects.len());
        host.set_component_value(&result);
        result
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbox_core::{Bbox, Bounds};
    use bbox_render::ShapeStyle;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Recorder(Vec<HostResult>);

    impl HostBridge for Recorder {
        fn set_component_value(&mut self, value: &HostResult) {
            self.0.push(value.clone());
        }
        fn set_frame_height(&mut self, _height: f64) {}
    }

    #[test]
    fn geometry_comes_from_live_shapes() {
        let boxes = vec![Bbox::new(Bounds::new(0.0, 0.0, 5.0, 5.0), "dog")];
        let store = BoxStore::from_boxes(boxes.clone());
        let mut surface = Surface::build(10.0, 10.0, None, &boxes, ShapeStyle::default());
        surface.set_bounds(0, Bounds::new(2.0, 3.0, 5.0, 5.0));

        let result = SyncEmitter::collect(&store, &surface);
        assert_eq!(
            result.rects,
            vec![RectRecord {
                top: 3.0,
                left: 2.0,
                width: 5.0,
                height: 5.0,
                label: "dog".into(),
            }]
        );
    }

    #[test]
    fn emitting_twice_is_idempotent() {
        let boxes = vec![Bbox::new(Bounds::new(1.0, 1.0, 2.0, 2.0), "x")];
        let store = BoxStore::from_boxes(boxes.clone());
        let surface = Surface::build(10.0, 10.0, None, &boxes, ShapeStyle::default());
        let mut host = Recorder::default();
        let mut emitter = SyncEmitter::new();
        emitter.emit(&store, &surface, &mut host);
        emitter.emit(&store, &surface, &mut host);
        assert_eq!(emitter.emitted(), 2);
        assert_eq!(host.0[0], host.0[1]);
    }
}
