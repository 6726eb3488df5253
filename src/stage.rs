use crate::config::Config;
use crate::error::ConfigValidationError;
use crate::geometry::Point;
use crate::registry::{LabelEntry, RingRegistry};
use crate::render::Renderer;
use crate::ring::{Ring, RingId, RingSettings, SliderConfig};
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONTAINER_SIZE: f64 = 400.0;
pub const DEFAULT_SIDEBAR_WIDTH: f64 = 200.0;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ContainerId(String);

crate::impl_string_newtype!(ContainerId);

/// A square drawing surface hosting concentric rings around its center.
#[derive(Debug, Clone)]
pub struct Container {
    id: ContainerId,
    size: f64,
    sidebar_width: f64,
    registry: RingRegistry,
}

impl Container {
    pub fn new(id: ContainerId, size: f64, sidebar_width: f64) -> Self {
        Self {
            id,
            size,
            sidebar_width,
            registry: RingRegistry::new(),
        }
    }

    pub fn id(&self) -> &ContainerId {
        &self.id
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn sidebar_width(&self) -> f64 {
        self.sidebar_width
    }

    pub fn center(&self) -> Point {
        Point::new(self.size / 2.0, self.size / 2.0)
    }

    pub fn registry(&self) -> &RingRegistry {
        &self.registry
    }

    /// Container-local device coordinates (origin top left) to ring space.
    pub fn to_ring_space(&self, device: Point) -> Point {
        let center = self.center();
        Point::new(device.x - center.x, device.y - center.y).to_ring_space()
    }

    /// Ring space back to container-local device coordinates.
    pub fn to_device(&self, ring_point: Point) -> Point {
        let center = self.center();
        let p = ring_point.from_ring_space();
        Point::new(p.x + center.x, p.y + center.y)
    }
}

/// Owns every container, its registry, and the rings they reference.
#[derive(Debug, Clone, Default)]
pub struct Stage {
    containers: Vec<Container>,
    rings: Vec<Ring>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds containers and rings from a loaded config.
    ///
    /// Invalid rings are skipped and returned alongside the stage; a duplicate
    /// container declaration fails the whole build.
    pub fn from_config(
        config: &Config,
        renderer: &mut impl Renderer,
    ) -> Result<(Self, Vec<ConfigValidationError>), ConfigValidationError> {
        let mut stage = Self::new();
        for container in &config.containers {
            stage.add_container(container.id.clone(), container.size, container.sidebar_width)?;
        }

        let mut skipped = Vec::new();
        for (i, ring) in config.sliders.iter().enumerate() {
            let result = ring
                .slider_config()
                .and_then(|slider| stage.add_ring(slider, ring.settings(), renderer));
            if let Err(e) = result {
                log::warn!("Skipping slider #{} ({}): {}", i, ring.label(), e);
                skipped.push(e);
            }
        }
        Ok((stage, skipped))
    }

    pub fn add_container(
        &mut self,
        id: ContainerId,
        size: f64,
        sidebar_width: f64,
    ) -> Result<(), ConfigValidationError> {
        if self.container(&id).is_some() {
            return Err(ConfigValidationError::DuplicateContainer(id));
        }
        self.containers.push(Container::new(id, size, sidebar_width));
        Ok(())
    }

    /// Creates a ring, lets the renderer draw it once, and registers it with
    /// its container.
    pub fn add_ring(
        &mut self,
        config: SliderConfig,
        settings: RingSettings,
        renderer: &mut impl Renderer,
    ) -> Result<RingId, ConfigValidationError> {
        let container = self
            .containers
            .iter_mut()
            .find(|c| c.id == config.container)
            .ok_or_else(|| ConfigValidationError::UnknownContainer(config.container.clone()))?;

        let id = RingId(self.rings.len());
        let radius = config.radius;
        let mut ring = Ring::new(id, config, settings);
        ring.set_render_handle(renderer.on_render_init(&ring));

        container.registry.register(id, radius);
        log::debug!(
            "Registered {} (radius {}) in container {}",
            id,
            radius,
            container.id
        );
        self.rings.push(ring);
        Ok(id)
    }

    pub fn container(&self, id: &ContainerId) -> Option<&Container> {
        self.containers.iter().find(|c| &c.id == id)
    }

    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    pub fn ring(&self, id: RingId) -> Option<&Ring> {
        self.rings.get(id.index())
    }

    pub(crate) fn ring_mut(&mut self, id: RingId) -> Option<&mut Ring> {
        self.rings.get_mut(id.index())
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    /// Rings of `container` in hit-test order.
    pub fn rings_in<'a>(&'a self, container: &ContainerId) -> impl Iterator<Item = &'a Ring> + 'a {
        self.container(container)
            .into_iter()
            .flat_map(|c| c.registry.ids())
            .filter_map(|id| self.rings.get(id.index()))
    }

    pub fn find_hit(&self, container: &ContainerId, point: Point) -> Option<RingId> {
        self.container(container)?
            .registry
            .find_hit(&self.rings, point)
    }

    pub fn labels(&self, container: &ContainerId) -> Vec<LabelEntry> {
        self.container(container)
            .map(|c| c.registry.labels(&self.rings))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::LogRenderer;
    use approx::assert_abs_diff_eq;

    fn slider(container: &str, radius: f64) -> SliderConfig {
        SliderConfig::new(ContainerId::new(container), 0.0, 100.0, 5.0, radius, 20.0).unwrap()
    }

    #[test]
    fn test_unknown_container_is_rejected() {
        let mut stage = Stage::new();
        let mut renderer = LogRenderer::default();
        let err = stage
            .add_ring(slider("missing", 70.0), RingSettings::default(), &mut renderer)
            .unwrap_err();
        assert_eq!(
            err,
            ConfigValidationError::UnknownContainer(ContainerId::new("missing"))
        );
        assert!(stage.rings().is_empty());
    }

    #[test]
    fn test_duplicate_container_is_rejected() {
        let mut stage = Stage::new();
        stage.add_container(ContainerId::new("a"), 400.0, 200.0).unwrap();
        assert!(matches!(
            stage.add_container(ContainerId::new("a"), 300.0, 200.0),
            Err(ConfigValidationError::DuplicateContainer(_))
        ));
    }

    #[test]
    fn test_rings_get_render_handles_and_order() {
        let mut stage = Stage::new();
        let mut renderer = LogRenderer::default();
        stage.add_container(ContainerId::new("a"), 400.0, 200.0).unwrap();
        stage.add_container(ContainerId::new("b"), 400.0, 200.0).unwrap();
        for (container, radius) in [("a", 40.0), ("a", 100.0), ("b", 55.0), ("a", 70.0)] {
            stage
                .add_ring(slider(container, radius), RingSettings::default(), &mut renderer)
                .unwrap();
        }

        let radii: Vec<f64> = stage
            .rings_in(&ContainerId::new("a"))
            .map(|r| r.config().radius)
            .collect();
        assert_eq!(radii, vec![100.0, 70.0, 40.0]);
        assert_eq!(stage.rings_in(&ContainerId::new("b")).count(), 1);
        assert!(stage.rings().iter().all(|r| r.render_handle().is_some()));
    }

    #[test]
    fn test_device_transform_round_trip() {
        let container = Container::new(ContainerId::new("a"), 400.0, 200.0);
        // straight above the center is angle zero in ring space
        let above = container.to_ring_space(Point::new(200.0, 130.0));
        assert_abs_diff_eq!(above.x, 70.0);
        assert_abs_diff_eq!(above.y, 0.0);

        let right = container.to_ring_space(Point::new(270.0, 200.0));
        assert_abs_diff_eq!(right.x, 0.0);
        assert_abs_diff_eq!(right.y, 70.0);

        let device = Point::new(123.0, 321.0);
        let back = container.to_device(container.to_ring_space(device));
        assert_abs_diff_eq!(back.x, device.x);
        assert_abs_diff_eq!(back.y, device.y);
    }
}
