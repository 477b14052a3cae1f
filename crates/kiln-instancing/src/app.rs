use anyhow::Context;
use glam::Vec3;

use kiln_engine::camera::{CameraPersp, CameraUi};
use kiln_engine::color::Color;
use kiln_engine::core::{App, AppControl, FrameCtx, SetupCtx};
use kiln_engine::geom::{Sphere, TriMesh};
use kiln_engine::gfx::{
    Attrib, AttribFormat, AttribMapping, Batch, BufferLayout, DrawCall, Program, Vbo, VboMesh,
};
use kiln_engine::input::{InputEvent, PointerButtonEvent};

use crate::grid::{build_instances, GridConfig};
use crate::shader::{self, INSTANCE_COLOR, INSTANCE_POSITION};

const CAMERA_EYE: Vec3 = Vec3::new(0.0, 0.0, 20.0);
const CAMERA_FOV_Y: f32 = 60.0;
const CAMERA_NEAR: f32 = 0.1;
const CAMERA_FAR: f32 = 1000.0;

/// Draws every grid cell as a sphere instance, in one draw call per frame.
pub struct InstanceApp {
    config: GridConfig,
    base_mesh: TriMesh,
    camera: CameraPersp,
    camera_ui: CameraUi,
    batch: Option<Batch>,
}

impl InstanceApp {
    pub fn new(config: GridConfig) -> Self {
        let base_mesh = Sphere::new()
            .radius(config.sphere_radius)
            .subdivisions(config.sphere_subdivisions)
            .to_mesh();

        let mut camera = CameraPersp::new(1000, 1000, CAMERA_FOV_Y, CAMERA_NEAR, CAMERA_FAR);
        camera.look_at(CAMERA_EYE, Vec3::ZERO);

        Self {
            config,
            base_mesh,
            camera,
            camera_ui: CameraUi::new(),
            batch: None,
        }
    }

    pub fn camera(&self) -> &CameraPersp {
        &self.camera
    }

    /// The single draw issued each frame: the whole sphere, once per grid cell.
    pub fn draw_call(&self) -> DrawCall {
        DrawCall::indexed(self.base_mesh.num_indices() as u32, self.config.instance_count())
    }
}

impl App for InstanceApp {
    fn setup(&mut self, ctx: &mut SetupCtx<'_, '_>) -> anyhow::Result<()> {
        let size = ctx.size();
        self.camera.set_aspect_from_size(size.width, size.height);

        let instances = build_instances(&self.config);
        log::info!(
            "grid {}x{}x{}: {} instances",
            self.config.counts.x,
            self.config.counts.y,
            self.config.counts.z,
            instances.len()
        );

        let device = ctx.device();
        let mut mesh = VboMesh::create(device, &self.base_mesh);

        let positions = Vbo::create(device, "instance positions", &instances.positions);
        mesh.append_vbo(
            BufferLayout::per_instance().append(Attrib::custom(INSTANCE_POSITION), AttribFormat::Float32x3),
            positions,
        );

        let colors = Vbo::create(device, "instance colors", &instances.colors);
        mesh.append_vbo(
            BufferLayout::per_instance().append(Attrib::custom(INSTANCE_COLOR), AttribFormat::Float32x3),
            colors,
        );

        let program = Program::create(device, shader::program_format());

        let mapping = AttribMapping::new()
            .map(Attrib::custom(INSTANCE_POSITION), INSTANCE_POSITION)
            .map(Attrib::custom(INSTANCE_COLOR), INSTANCE_COLOR);

        let batch = Batch::create(device, ctx.target_formats(), mesh, program, &mapping)
            .context("failed to bind sphere mesh to instance program")?;

        self.batch = Some(batch);
        Ok(())
    }

    fn mouse_down(&mut self, _event: &PointerButtonEvent) {}

    fn on_input(&mut self, event: &InputEvent) -> AppControl {
        self.camera_ui.handle_event(&mut self.camera, event);
        AppControl::Continue
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect_from_size(width, height);
    }

    fn draw(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(batch) = self.batch.as_ref() else {
            return AppControl::Continue;
        };

        let call = self.draw_call();
        let camera = &self.camera;

        ctx.render(Color::black(), |rctx, target| {
            batch.set_matrices(rctx.queue, camera);
            batch.draw(target, call);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::UVec3;
    use kiln_engine::input::{Modifiers, MouseButton, MouseButtonState, MouseWheelDelta, PointerMoveEvent};

    fn press(button: MouseButton, state: MouseButtonState, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent { button, state, x, y, modifiers: Modifiers::default() })
    }

    #[test]
    fn initial_camera_pose() {
        let app = InstanceApp::new(GridConfig::default());
        let cam = app.camera();
        assert_eq!(cam.eye, CAMERA_EYE);
        assert_eq!(cam.target, Vec3::ZERO);
        assert_eq!(cam.fov_y_degrees, 60.0);
        assert_eq!(cam.near, 0.1);
        assert_eq!(cam.far, 1000.0);
    }

    #[test]
    fn draw_call_covers_whole_grid_and_sphere() {
        let app = InstanceApp::new(GridConfig::default());
        let call = app.draw_call();
        assert_eq!(call.instance_count(), 50 * 50 * 50);
        assert_eq!(call.instances.start, 0);
        assert_eq!(call.indices, 0..144);
    }

    #[test]
    fn draw_call_ignores_camera_state() {
        let mut app = InstanceApp::new(GridConfig::default());
        let before = app.draw_call();

        app.on_input(&press(MouseButton::Left, MouseButtonState::Pressed, 10.0, 10.0));
        app.on_input(&InputEvent::PointerMoved(PointerMoveEvent { x: 200.0, y: 80.0 }));
        app.on_input(&press(MouseButton::Left, MouseButtonState::Released, 200.0, 80.0));
        app.on_input(&InputEvent::MouseWheel {
            delta: MouseWheelDelta::Line { x: 0.0, y: 3.0 },
            modifiers: Modifiers::default(),
        });
        app.resize(1920, 1080);

        assert_ne!(app.camera().eye, CAMERA_EYE);
        assert_eq!(app.draw_call(), before);
    }

    #[test]
    fn small_grid_instance_count() {
        let app = InstanceApp::new(GridConfig { counts: UVec3::new(2, 3, 4), ..GridConfig::default() });
        assert_eq!(app.draw_call().instance_count(), 24);
    }
}
