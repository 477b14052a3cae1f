use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, SetupCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::translate_window_event;
use crate::input::{InputFrame, InputState, Key};
use crate::time::{FrameClock, FrameTime};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Close the window when `Escape` is pressed.
    pub exit_on_escape: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "kiln".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            exit_on_escape: true,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window, runs `app` in it until the window closes, and returns
    /// the first fatal error (window/GPU creation or `App::setup`), if any.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Lifecycle of the single app window.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Phase {
    /// No window or GPU yet, or `setup` has not completed.
    Uninitialized,
    /// `setup` succeeded; frames are drawn.
    Ready,
    /// Exit requested; no more callbacks reach the app.
    Exiting,
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    phase: Phase,
    window: Option<WindowEntry>,
    error: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            phase: Phase::Uninitialized,
            window: None,
            error: None,
        }
    }

    fn exit(&mut self, event_loop: &ActiveEventLoop) {
        if self.phase != Phase::Exiting {
            log::info!("runtime exiting");
        }
        self.phase = Phase::Exiting;
        // Dropping the entry releases the surface before the window.
        self.window = None;
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.error.is_none() {
            self.error = Some(err);
        }
        self.exit(event_loop);
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        WindowEntryTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init))
                    .context("GPU initialization failed for window")
            },
        }
        .try_build()
    }

    fn setup(&mut self) -> Result<()> {
        let Some(entry) = self.window.as_ref() else {
            anyhow::bail!("setup called without a window");
        };
        let app = &mut self.app;

        entry.with(|fields| {
            let mut ctx = SetupCtx {
                window: WindowCtx { window: fields.window },
                gpu: fields.gpu,
            };
            app.setup(&mut ctx)
        })
        .context("app setup failed")
    }

    fn redraw(&mut self) -> AppControl {
        let (app, Some(entry)) = (&mut self.app, self.window.as_mut()) else {
            return AppControl::Continue;
        };

        entry.with_mut(|fields| {
            let time: FrameTime = fields.clock.tick();
            app.update(time);

            let control = {
                let mut ctx = FrameCtx {
                    window: WindowCtx { window: fields.window },
                    gpu: fields.gpu,
                    input: fields.input_state,
                    input_frame: fields.input_frame,
                    time,
                };
                app.draw(&mut ctx)
            };

            // Clear per-frame deltas after the frame is consumed.
            fields.input_frame.clear();
            control
        })
    }

    fn resize(&mut self, new_size: Option<PhysicalSize<u32>>) {
        let Some(entry) = self.window.as_mut() else { return };

        let size = new_size.unwrap_or_else(|| entry.with_window(|w| w.inner_size()));
        entry.with_gpu_mut(|gpu| gpu.resize(size));
        entry.with_window(|w| w.request_redraw());

        if size.width > 0 && size.height > 0 && self.phase == Phase::Ready {
            self.app.resize(size.width, size.height);
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.phase == Phase::Exiting {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(entry) => self.window = Some(entry),
            Err(err) => return self.fail(event_loop, err),
        }

        if let Err(err) = self.setup() {
            return self.fail(event_loop, err);
        }

        self.phase = Phase::Ready;
        log::info!("runtime ready");

        if let Some(entry) = self.window.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.phase == Phase::Exiting {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw: one frame per display refresh.
        if let Some(entry) = self.window.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.phase != Phase::Ready {
            if self.phase == Phase::Exiting {
                event_loop.exit();
            }
            return;
        }

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, Some(entry)) = (&mut self.app, self.window.as_mut()) else {
            return;
        };

        let exit_on_escape = self.config.exit_on_escape;
        let mut control = AppControl::Continue;

        entry.with_mut(|fields| {
            let Some(ev) = translate_window_event(fields.window, fields.input_state, &event) else {
                return;
            };
            fields.input_state.apply_event(fields.input_frame, ev.clone());

            if let Some(press) = ev.as_press() {
                app.mouse_down(press);
            }
            control = app.on_input(&ev);

            if exit_on_escape && ev.is_key_press(Key::Escape) {
                control = AppControl::Exit;
            }
        });

        if control == AppControl::Exit {
            return self.exit(event_loop);
        }

        match event {
            WindowEvent::CloseRequested => self.exit(event_loop),

            WindowEvent::Resized(new_size) => self.resize(Some(new_size)),

            WindowEvent::ScaleFactorChanged { .. } => self.resize(None),

            WindowEvent::RedrawRequested => {
                if self.redraw() == AppControl::Exit {
                    self.exit(event_loop);
                }
            }

            _ => {}
        }
    }
}
