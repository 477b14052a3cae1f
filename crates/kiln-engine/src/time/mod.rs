//! Frame timing.
//!
//! One `FrameClock` lives next to the window; the runtime calls `tick()` once
//! per redraw and passes the resulting `FrameTime` to `App::update`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
