use crate::error::{ConfigValidationError, DegenerateInputError};
use crate::geometry::{self, FULL_TURN, Point};
use crate::quantize::StepTable;
use crate::render::{RenderHandle, RenderUpdate};
use crate::stage::ContainerId;
use derive_more::Display;

pub const DEFAULT_LABEL: &str = "Unknown Expense";
pub const DEFAULT_STROKE_WIDTH: f64 = 20.0; // background stroke, doubles as hit band
pub const DEFAULT_DASH_WIDTH: f64 = 6.0;
pub const DEFAULT_WANTED_SPACE_WIDTH: f64 = 3.0;
pub const DEFAULT_TRACK_COLOR: &str = "#D5D5D5";
pub const DEFAULT_HANDLE_DIAMETER: f64 = 24.0;
pub const DEFAULT_HANDLE_STROKE_WIDTH: f64 = 2.0;
pub const DEFAULT_OPACITY: f64 = 0.7;
pub const VALUE_PREFIX: &str = "$";

/// Index of a ring inside its [`crate::stage::Stage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("ring#{_0}")]
pub struct RingId(pub(crate) usize);

impl RingId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Validated, immutable geometry and value range of a ring.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderConfig {
    pub container: ContainerId,
    pub min_value: f64,
    pub max_value: f64,
    pub step: f64,
    pub radius: f64,
    pub stroke_width: f64,
}

impl SliderConfig {
    pub fn new(
        container: ContainerId,
        min_value: f64,
        max_value: f64,
        step: f64,
        radius: f64,
        stroke_width: f64,
    ) -> Result<Self, ConfigValidationError> {
        for (field, value) in [
            ("min_value", min_value),
            ("max_value", max_value),
            ("step", step),
            ("radius", radius),
            ("stroke_width", stroke_width),
        ] {
            if !value.is_finite() {
                return Err(ConfigValidationError::NotFinite { field, value });
            }
        }
        for (field, value) in [("step", step), ("radius", radius), ("stroke_width", stroke_width)] {
            if value <= 0.0 {
                return Err(ConfigValidationError::NonPositive { field, value });
            }
        }
        if min_value >= max_value {
            return Err(ConfigValidationError::EmptyRange {
                min: min_value,
                max: max_value,
            });
        }
        if !(max_value - min_value).is_finite() {
            return Err(ConfigValidationError::RangeOverflow {
                min: min_value,
                max: max_value,
            });
        }

        Ok(Self {
            container,
            min_value,
            max_value,
            step,
            radius,
            stroke_width,
        })
    }

    fn inner_radius(&self) -> f64 {
        self.radius - self.stroke_width / 2.0
    }

    fn outer_radius(&self) -> f64 {
        self.radius + self.stroke_width / 2.0
    }
}

/// Presentation settings handed through to the renderer untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct RingSettings {
    pub label: String,
    pub color: Option<String>,
    pub track_color: String,
    pub dash_width: f64,
    pub wanted_space_width: f64,
    pub handle_diameter: f64,
    pub handle_stroke_width: f64,
    pub opacity: f64,
}

impl Default for RingSettings {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            color: None,
            track_color: DEFAULT_TRACK_COLOR.to_string(),
            dash_width: DEFAULT_DASH_WIDTH,
            wanted_space_width: DEFAULT_WANTED_SPACE_WIDTH,
            handle_diameter: DEFAULT_HANDLE_DIAMETER,
            handle_stroke_width: DEFAULT_HANDLE_STROKE_WIDTH,
            opacity: DEFAULT_OPACITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderState {
    pub angle: f64,
    pub value: f64,
    pub dragging: bool,
}

/// One radial slider. Idle until a drag session claims it.
#[derive(Debug, Clone)]
pub struct Ring {
    id: RingId,
    config: SliderConfig,
    settings: RingSettings,
    table: StepTable,
    state: SliderState,
    handle: Option<RenderHandle>,
}

impl Ring {
    pub fn new(id: RingId, config: SliderConfig, settings: RingSettings) -> Self {
        let table = StepTable::new(config.min_value, config.max_value, config.step);
        let state = SliderState {
            angle: 0.0,
            value: config.min_value,
            dragging: false,
        };
        Self {
            id,
            config,
            settings,
            table,
            state,
            handle: None,
        }
    }

    pub fn id(&self) -> RingId {
        self.id
    }

    pub fn config(&self) -> &SliderConfig {
        &self.config
    }

    pub fn settings(&self) -> &RingSettings {
        &self.settings
    }

    pub fn step_table(&self) -> &StepTable {
        &self.table
    }

    pub fn state(&self) -> SliderState {
        self.state
    }

    pub fn render_handle(&self) -> Option<RenderHandle> {
        self.handle
    }

    pub(crate) fn set_render_handle(&mut self, handle: RenderHandle) {
        self.handle = Some(handle);
    }

    /// `(dash, space)` pair for the dashed background track.
    pub fn dash_pattern(&self) -> (f64, f64) {
        (
            self.settings.dash_width,
            geometry::dash_spacing(
                self.config.radius,
                self.settings.dash_width,
                self.settings.wanted_space_width,
            ),
        )
    }

    /// Current position as a fraction of a full turn.
    pub fn fraction(&self) -> f64 {
        self.state.angle / FULL_TURN
    }

    /// Linear value at `fraction` of the range, ignoring steps.
    pub fn value_for_fraction(&self, fraction: f64) -> f64 {
        (self.config.max_value - self.config.min_value) * fraction + self.config.min_value
    }

    pub fn value_text(&self) -> String {
        format_value(self.state.value)
    }

    /// Distance from the center estimated from the angle: `|y / sin(angle)|`.
    ///
    /// Known approximation. Exact away from the horizontal axis but
    /// undefined on it, where it reports [`DegenerateInputError::HorizontalAxis`].
    pub fn radial_distance(point: Point) -> Result<f64, DegenerateInputError> {
        let angle = geometry::angle_from_point(point)?;
        let sin = angle.sin();
        if sin == 0.0 {
            return Err(DegenerateInputError::HorizontalAxis);
        }
        Ok((point.y / sin).abs())
    }

    /// `point` is in ring space.
    pub fn hit_test(&self, point: Point) -> bool {
        match Self::radial_distance(point) {
            Ok(distance) => {
                self.config.inner_radius() < distance && distance < self.config.outer_radius()
            }
            Err(e) => {
                log::trace!("{} ignores {:?}: {}", self.id, point, e);
                false
            }
        }
    }

    pub(crate) fn begin_drag(&mut self, point: Point) -> bool {
        if self.state.dragging {
            return true;
        }
        self.state.dragging = self.hit_test(point);
        self.state.dragging
    }

    pub(crate) fn update_drag(&mut self, point: Point) -> Option<RenderUpdate> {
        if !self.state.dragging {
            return None;
        }
        let angle = match geometry::angle_from_point(point) {
            Ok(angle) => angle,
            Err(e) => {
                log::trace!("{} drag update absorbed: {}", self.id, e);
                return None;
            }
        };

        let quantized = self.table.quantize(angle);
        self.state.angle = quantized.angle;
        self.state.value = quantized.value;
        Some(self.render_update())
    }

    pub(crate) fn end_drag(&mut self) {
        self.state.dragging = false;
    }

    /// Geometry for the current state, centered on the ring origin.
    pub fn render_update(&self) -> RenderUpdate {
        RenderUpdate {
            angle: self.state.angle,
            value: self.state.value,
            handle: geometry::point_on_circle(Point::ORIGIN, self.config.radius, self.state.angle),
            arc: geometry::describe_arc(Point::ORIGIN, self.config.radius, self.state.angle),
            label_text: self.value_text(),
        }
    }
}

pub fn format_value(value: f64) -> String {
    format!("{VALUE_PREFIX}{value}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn ring(radius: f64) -> Ring {
        let config =
            SliderConfig::new(ContainerId::new("c"), 0.0, 100.0, 25.0, radius, 20.0).unwrap();
        Ring::new(RingId(0), config, RingSettings::default())
    }

    #[test]
    fn test_config_validation() {
        let c = || ContainerId::new("c");
        assert_eq!(
            SliderConfig::new(c(), 10.0, 10.0, 1.0, 50.0, 20.0),
            Err(ConfigValidationError::EmptyRange { min: 10.0, max: 10.0 })
        );
        assert!(matches!(
            SliderConfig::new(c(), 0.0, 10.0, 0.0, 50.0, 20.0),
            Err(ConfigValidationError::NonPositive { field: "step", .. })
        ));
        assert!(matches!(
            SliderConfig::new(c(), 0.0, 10.0, 1.0, -5.0, 20.0),
            Err(ConfigValidationError::NonPositive { field: "radius", .. })
        ));
        assert!(matches!(
            SliderConfig::new(c(), f64::NAN, 10.0, 1.0, 50.0, 20.0),
            Err(ConfigValidationError::NotFinite { field: "min_value", .. })
        ));
    }

    #[test]
    fn test_config_rejects_overflowing_range() {
        assert_eq!(
            SliderConfig::new(ContainerId::new("c"), -1e308, 1e308, 1.0, 70.0, 20.0),
            Err(ConfigValidationError::RangeOverflow { min: -1e308, max: 1e308 })
        );
    }

    #[test]
    fn test_fine_step_ring_builds_and_drags() {
        let config = SliderConfig::new(ContainerId::new("c"), 0.0, 1.0, 1e-9, 70.0, 20.0).unwrap();
        let mut r = Ring::new(RingId(0), config, RingSettings::default());
        assert!(r.begin_drag(Point::new(-70.0, 1.0)));
        let update = r.update_drag(Point::new(-70.0, 1e-6)).unwrap();
        assert_abs_diff_eq!(update.value, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_initial_state() {
        let r = ring(70.0);
        assert_eq!(
            r.state(),
            SliderState { angle: 0.0, value: 0.0, dragging: false }
        );
        assert_eq!(r.value_text(), "$0");
    }

    #[test]
    fn test_hit_test_band() {
        let r = ring(70.0);
        let up = |d: f64| geometry::point_on_circle(Point::ORIGIN, d, PI / 3.0);
        assert!(r.hit_test(up(70.0)));
        assert!(r.hit_test(up(79.0)));
        assert!(r.hit_test(up(61.0)));
        assert!(!r.hit_test(up(81.0)));
        assert!(!r.hit_test(up(59.0)));
    }

    #[test]
    fn test_hit_test_degenerate_points() {
        let r = ring(70.0);
        assert!(!r.hit_test(Point::ORIGIN));
        // on the horizontal axis the estimate is undefined or collapses to zero
        assert!(!r.hit_test(Point::new(70.0, 0.0)));
        assert!(!r.hit_test(Point::new(-70.0, 0.0)));
        assert_eq!(
            Ring::radial_distance(Point::new(70.0, 0.0)),
            Err(DegenerateInputError::HorizontalAxis)
        );
    }

    #[test]
    fn test_drag_lifecycle() {
        let mut r = ring(70.0);
        assert!(!r.begin_drag(Point::new(0.0, 10.0)));
        assert!(r.update_drag(Point::new(0.0, 70.0)).is_none());

        assert!(r.begin_drag(Point::new(0.0, 70.0)));
        let update = r.update_drag(Point::new(0.0, 70.0)).unwrap();
        assert_eq!(update.value, 25.0);
        assert_abs_diff_eq!(update.angle, PI / 2.0);
        assert_eq!(update.label_text, "$25");
        assert_abs_diff_eq!(update.handle.y, 70.0, epsilon = 1e-9);
        assert!(!update.arc.large_arc);

        // the drag follows the pointer outside the band
        let update = r.update_drag(Point::new(-5.0, -1.0)).unwrap();
        assert_eq!(update.value, 50.0);

        r.end_drag();
        assert!(!r.state().dragging);
        assert_eq!(r.state().value, 50.0);
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut r = ring(70.0);
        let p = Point::new(30.0, -60.0);
        assert!(r.begin_drag(p));
        let first = r.update_drag(p).unwrap();
        let state = r.state();
        let second = r.update_drag(p).unwrap();
        assert_eq!(first, second);
        assert_eq!(state, r.state());
    }

    #[test]
    fn test_update_at_center_is_absorbed() {
        let mut r = ring(70.0);
        assert!(r.begin_drag(Point::new(0.0, 70.0)));
        r.update_drag(Point::new(0.0, 70.0));
        assert!(r.update_drag(Point::ORIGIN).is_none());
        assert_eq!(r.state().value, 25.0);
    }

    #[test]
    fn test_fraction_and_linear_value() {
        let mut r = ring(70.0);
        r.begin_drag(Point::new(0.0, 70.0));
        r.update_drag(Point::new(-70.0, 1.0));
        assert_abs_diff_eq!(r.fraction(), 0.5);
        assert_abs_diff_eq!(r.value_for_fraction(0.5), 50.0);
    }

    #[test]
    fn test_dash_pattern() {
        let r = ring(100.0);
        let (dash, space) = r.dash_pattern();
        assert_eq!(dash, 6.0);
        assert_abs_diff_eq!(space, geometry::dash_spacing(100.0, 6.0, 3.0));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(725.0), "$725");
        assert_eq!(format_value(2.5), "$2.5");
    }
}
