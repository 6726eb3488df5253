//! Geometry and interaction engine for concentric radial sliders.
//!
//! A [`stage::Stage`] owns containers; each container keeps its rings in a
//! [`registry::RingRegistry`] sorted outermost first. Pointer events go
//! through an [`controller::InteractionController`], which attributes each
//! gesture to one ring and forwards the quantized result to a
//! [`render::Renderer`].

pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod macros;
pub mod quantize;
pub mod registry;
pub mod render;
pub mod ring;
pub mod stage;
