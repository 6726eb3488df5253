use crate::geometry::{ArcDescriptor, Point};
use crate::ring::Ring;
use derive_more::{Display, From, Into};

/// Opaque reference a renderer hands out for the visuals of one ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
pub struct RenderHandle(u64);

/// Everything a renderer needs to redraw a ring after its value changed.
///
/// Points are in ring space around the container center; use
/// [`crate::stage::Container::to_device`] to place them on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderUpdate {
    pub angle: f64,
    pub value: f64,
    pub handle: Point,
    pub arc: ArcDescriptor,
    pub label_text: String,
}

/// The drawing collaborator. The core never owns visual objects.
pub trait Renderer {
    /// Called once per ring when it joins a stage.
    fn on_render_init(&mut self, ring: &Ring) -> RenderHandle;

    /// Called whenever a drag moves the ring to a new position.
    fn on_render_update(&mut self, ring: &Ring, update: &RenderUpdate);
}

/// Renderer that only logs; used by the CLI and tests.
#[derive(Debug, Default)]
pub struct LogRenderer {
    next_handle: u64,
    pub updates: Vec<(RenderHandle, RenderUpdate)>,
}

impl Renderer for LogRenderer {
    fn on_render_init(&mut self, ring: &Ring) -> RenderHandle {
        let handle = RenderHandle(self.next_handle);
        self.next_handle += 1;
        log::debug!(
            "render init {} '{}' radius {} -> handle {}",
            ring.id(),
            ring.settings().label,
            ring.config().radius,
            handle
        );
        handle
    }

    fn on_render_update(&mut self, ring: &Ring, update: &RenderUpdate) {
        log::info!(
            "'{}' -> {} (angle {:.4}, arc \"{}\")",
            ring.settings().label,
            update.label_text,
            update.angle,
            update.arc
        );
        if let Some(handle) = ring.render_handle() {
            self.updates.push((handle, update.clone()));
        }
    }
}
