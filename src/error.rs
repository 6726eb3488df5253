use crate::stage::ContainerId;
use thiserror::Error;

/// Raised while building a ring from its configuration. Fatal to that ring only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("missing required field `{field}`")]
    Missing { field: &'static str },
    #[error("field `{field}` must be a number")]
    NotNumeric { field: &'static str },
    #[error("field `{field}` must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("field `{field}` must be greater than zero, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("min_value ({min}) must be less than max_value ({max})")]
    EmptyRange { min: f64, max: f64 },
    #[error("range {min}..{max} is too wide to represent")]
    RangeOverflow { min: f64, max: f64 },
    #[error("there is no such container: {0}")]
    UnknownContainer(ContainerId),
    #[error("container {0} is declared twice")]
    DuplicateContainer(ContainerId),
}

/// A pointer position the angle formulas cannot handle.
///
/// These come from boundary pointer positions, never from programming errors,
/// so callers absorb them as "no interaction".
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateInputError {
    #[error("point coincides with the ring center")]
    ZeroVector,
    #[error("point has a non-finite coordinate")]
    NonFinite,
    #[error("point lies on the horizontal axis through the center")]
    HorizontalAxis,
}
