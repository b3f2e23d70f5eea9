//! Shared GPU context and camera for the verse visualizer
//!
//! Window and device setup live in [`graphics`], the orbital camera in [`camera`].

pub mod graphics;
pub mod camera;

pub use graphics::*;
pub use camera::*;
