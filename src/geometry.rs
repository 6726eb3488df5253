use crate::error::DegenerateInputError;
use std::f64::consts::PI;
use std::fmt;

pub const FULL_TURN: f64 = 2.0 * PI;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Rotates a center-relative input point into ring space
    /// (`x = -y_input`, `y = x_input`). Every angle formula assumes these axes.
    pub fn to_ring_space(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Inverse of [`Point::to_ring_space`].
    pub fn from_ring_space(self) -> Self {
        Self::new(self.y, -self.x)
    }
}

/// Angle of the vector `p`, in `[0, 2π)`.
///
/// Uses `asin` with a quadrant correction instead of `atan2`: left half-plane
/// maps to `π - asin`, lower right quadrant to `2π + asin`.
pub fn angle_from_point(p: Point) -> Result<f64, DegenerateInputError> {
    if !p.x.is_finite() || !p.y.is_finite() {
        return Err(DegenerateInputError::NonFinite);
    }
    let length = p.length();
    if length == 0.0 {
        return Err(DegenerateInputError::ZeroVector);
    }

    let angle = (p.y / length).asin();
    if p.x < 0.0 {
        Ok(PI - angle)
    } else if p.y < 0.0 {
        // a vanishing negative y rounds up to a full turn
        let wrapped = FULL_TURN + angle;
        Ok(if wrapped >= FULL_TURN { 0.0 } else { wrapped })
    } else {
        Ok(angle)
    }
}

pub fn point_on_circle(center: Point, radius: f64, angle: f64) -> Point {
    Point::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

/// Renderer-agnostic description of the value arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcDescriptor {
    pub start: Point,
    pub end: Point,
    pub radius: f64,
    pub large_arc: bool,
    pub sweep: bool,
}

/// Arc from the point at `end_angle` back to the point at angle 0.
pub fn describe_arc(center: Point, radius: f64, end_angle: f64) -> ArcDescriptor {
    ArcDescriptor {
        start: point_on_circle(center, radius, end_angle),
        end: point_on_circle(center, radius, 0.0),
        radius,
        large_arc: end_angle > PI,
        sweep: false,
    }
}

impl fmt::Display for ArcDescriptor {
    /// SVG path data.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "M {} {} A {} {} 0 {} {} {} {}",
            self.start.x,
            self.start.y,
            self.radius,
            self.radius,
            u8::from(self.large_arc),
            u8::from(self.sweep),
            self.end.x,
            self.end.y
        )
    }
}

/// Space between dashes so that a whole number of dashes tiles the circle.
///
/// The circumference must fit at least one `dash_width + wanted_space_width`.
pub fn dash_spacing(radius: f64, dash_width: f64, wanted_space_width: f64) -> f64 {
    let circumference = FULL_TURN * radius;
    let number_of_dashes = (circumference / (dash_width + wanted_space_width)).floor();
    circumference / number_of_dashes - dash_width
}
