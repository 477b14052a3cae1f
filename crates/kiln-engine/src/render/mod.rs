//! Frame-level rendering context.
//!
//! `FrameCtx::render` clears the attachments, then hands the app a
//! [`RenderCtx`] and a [`RenderTarget`] to record its own passes into.

mod ctx;

pub use ctx::{RenderCtx, RenderTarget, TargetFormats};
