//! Kiln engine crate.
//!
//! A small creative-coding framework: window + GPU runtime, app lifecycle,
//! input, a perspective camera with an orbit controller, and GPU resource
//! handles for drawing (instanced) meshes.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod camera;
pub mod color;
pub mod geom;
pub mod gfx;
pub mod render;
