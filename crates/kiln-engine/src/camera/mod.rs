//! 3D camera model and its interactive controller.

mod persp;
mod ui;

pub use persp::{CameraPersp, CameraUniforms};
pub use ui::CameraUi;
