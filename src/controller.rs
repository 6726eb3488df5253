use crate::geometry::Point;
use crate::render::{RenderUpdate, Renderer};
use crate::ring::RingId;
use crate::stage::{ContainerId, Stage};
use strum::{Display as StrumDisplay, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive)]
pub enum PointerDevice {
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId {
    pub device: PointerDevice,
    pub id: u32,
}

impl PointerId {
    pub fn mouse() -> Self {
        Self {
            device: PointerDevice::Mouse,
            id: 0,
        }
    }

    pub fn touch(id: u32) -> Self {
        Self {
            device: PointerDevice::Touch,
            id,
        }
    }
}

/// A press, move or release as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer: PointerId,
    /// Container-local device coordinates, origin at the top left. Moves and
    /// releases are relative to the container the session started in.
    pub position: Point,
}

impl PointerEvent {
    pub fn new(pointer: PointerId, x: f64, y: f64) -> Self {
        Self {
            pointer,
            position: Point::new(x, y),
        }
    }
}

/// Which ring owns the active gesture, and through which pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub pointer: PointerId,
    pub container: ContainerId,
    pub ring: RingId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PressOutcome {
    Captured(RingId),
    Missed,
    /// Another pointer already holds the session.
    Busy,
    UnknownContainer,
}

/// Attributes pointer gestures to rings. The only place a drag session is
/// created or destroyed.
#[derive(Debug, Default)]
pub struct InteractionController {
    session: Option<DragSession>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn on_press(
        &mut self,
        stage: &mut Stage,
        renderer: &mut impl Renderer,
        container: &ContainerId,
        event: PointerEvent,
    ) -> PressOutcome {
        match self.session.take() {
            // the owner pressed again, so its release was lost
            Some(stale) if stale.pointer == event.pointer => {
                if let Some(ring) = stage.ring_mut(stale.ring) {
                    ring.end_drag();
                }
                log::debug!("{:?} pressed again, dropping {}", event.pointer, stale.ring);
            }
            Some(session) => {
                log::debug!(
                    "Ignoring press from {:?}, {} is held by {:?}",
                    event.pointer,
                    session.ring,
                    session.pointer
                );
                self.session = Some(session);
                return PressOutcome::Busy;
            }
            None => {}
        }

        let Some(point) = stage.container(container).map(|c| c.to_ring_space(event.position))
        else {
            log::warn!("Press on unknown container {}", container);
            return PressOutcome::UnknownContainer;
        };

        let Some(id) = stage.find_hit(container, point) else {
            return PressOutcome::Missed;
        };
        let Some(ring) = stage.ring_mut(id) else {
            return PressOutcome::Missed;
        };
        if !ring.begin_drag(point) {
            return PressOutcome::Missed;
        }

        log::debug!("{:?} starts dragging {} in {}", event.pointer, id, container);
        self.session = Some(DragSession {
            pointer: event.pointer,
            container: container.clone(),
            ring: id,
        });

        // jump the handle to the press location
        if let Some(update) = ring.update_drag(point) {
            renderer.on_render_update(ring, &update);
        }
        PressOutcome::Captured(id)
    }

    pub fn on_move(
        &mut self,
        stage: &mut Stage,
        renderer: &mut impl Renderer,
        event: PointerEvent,
    ) -> Option<RenderUpdate> {
        let session = self
            .session
            .as_ref()
            .filter(|s| s.pointer == event.pointer)?;

        let point = stage.container(&session.container)?.to_ring_space(event.position);
        let ring = stage.ring_mut(session.ring)?;
        let update = ring.update_drag(point)?;
        log::trace!("{} -> {}", session.ring, update.label_text);
        renderer.on_render_update(ring, &update);
        Some(update)
    }

    /// Ends the session if `event` comes from the pointer that owns it.
    pub fn on_release(&mut self, stage: &mut Stage, event: PointerEvent) -> bool {
        let Some(session) = self.session.take_if(|s| s.pointer == event.pointer) else {
            return false;
        };
        if let Some(ring) = stage.ring_mut(session.ring) {
            ring.end_drag();
        }
        log::debug!("{:?} released {}", event.pointer, session.ring);
        true
    }
}
