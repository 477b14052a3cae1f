//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop) and
//! applications, and the contexts handed to each lifecycle callback.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, SetupCtx, WindowCtx};
