use crate::input::{InputEvent, PointerButtonEvent};
use crate::time::FrameTime;

use super::ctx::{FrameCtx, SetupCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application lifecycle driven by [`crate::window::Runtime`].
///
/// Call order: `setup` once after the GPU is ready, then per event
/// `mouse_down` / `on_input`, and per frame `update` followed by `draw`.
pub trait App {
    /// Builds GPU resources. An error here ends the run.
    fn setup(&mut self, ctx: &mut SetupCtx<'_, '_>) -> anyhow::Result<()>;

    /// Called for every pointer button press.
    fn mouse_down(&mut self, event: &PointerButtonEvent) {
        let _ = event;
    }

    /// Called for every translated input event, presses included.
    fn on_input(&mut self, event: &InputEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called after the surface was resized, with the new size in physical pixels.
    fn resize(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }

    fn update(&mut self, time: FrameTime) {
        let _ = time;
    }

    /// Called once per rendered frame.
    fn draw(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
