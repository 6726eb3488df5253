pub mod app;
pub mod scene;
pub mod theme;
pub mod view;

pub use scene::{RingVisual, SceneRenderer};
pub use view::draw;

pub const VALUE_FONT_SIZE: f64 = 30.0;
pub const LABEL_FONT_SIZE: f64 = 12.0;
pub const LABEL_ROW_HEIGHT: f64 = 44.0;
pub const SWATCH_WIDTH: f64 = 15.0;
pub const SWATCH_HEIGHT: f64 = 9.0;
pub const CONTAINER_SPACING: i32 = 24;
