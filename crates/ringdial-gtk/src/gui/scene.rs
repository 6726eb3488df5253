use ringdial::geometry::Point;
use ringdial::render::{RenderHandle, RenderUpdate, Renderer};
use ringdial::ring::Ring;
use std::collections::HashMap;

/// Last known drawing state of one ring.
#[derive(Debug, Clone, PartialEq)]
pub struct RingVisual {
    pub angle: f64,
    pub handle: Point,
    pub value_text: String,
}

impl From<&RenderUpdate> for RingVisual {
    fn from(update: &RenderUpdate) -> Self {
        Self {
            angle: update.angle,
            handle: update.handle,
            value_text: update.label_text.clone(),
        }
    }
}

/// Retained scene for the cairo draw functions. Drags write into it, the
/// next frame reads from it.
#[derive(Debug, Default)]
pub struct SceneRenderer {
    next_handle: u64,
    visuals: HashMap<RenderHandle, RingVisual>,
}

impl SceneRenderer {
    pub fn visual(&self, handle: RenderHandle) -> Option<&RingVisual> {
        self.visuals.get(&handle)
    }
}

impl Renderer for SceneRenderer {
    fn on_render_init(&mut self, ring: &Ring) -> RenderHandle {
        let handle = RenderHandle::from(self.next_handle);
        self.next_handle += 1;
        self.visuals
            .insert(handle, RingVisual::from(&ring.render_update()));
        handle
    }

    fn on_render_update(&mut self, ring: &Ring, update: &RenderUpdate) {
        match ring.render_handle() {
            Some(handle) => {
                self.visuals.insert(handle, RingVisual::from(update));
            }
            None => log::warn!("Update for {} before it was rendered", ring.id()),
        }
    }
}
