use glam::Vec3;

use crate::input::{InputEvent, MouseButton, MouseButtonState, PointerButtonEvent, PointerMoveEvent};

use super::CameraPersp;

/// Keeps the orbit pitch just short of the poles so `look_at` never degenerates.
const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Drag {
    Tumble,
    Pan,
    Dolly,
}

/// Mouse-driven orbit controller for a [`CameraPersp`].
///
/// - left drag: tumble the eye around the target
/// - middle drag: pan eye and target together
/// - right drag / wheel: dolly toward or away from the target
#[derive(Debug, Clone)]
pub struct CameraUi {
    /// Radians per logical pixel of drag.
    pub tumble_speed: f32,
    /// Fraction of the eye distance moved per logical pixel of pan.
    pub pan_speed: f32,
    /// Exponential dolly rate per wheel line (or per 10 px of right drag).
    pub dolly_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    drag: Option<Drag>,
    last_pos: Option<(f32, f32)>,
}

impl Default for CameraUi {
    fn default() -> Self {
        Self {
            tumble_speed: 0.01,
            pan_speed: 0.001,
            dolly_speed: 0.1,
            min_distance: 0.5,
            max_distance: 500.0,
            drag: None,
            last_pos: None,
        }
    }
}

impl CameraUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Feeds one input event. Returns `true` if the event moved the camera or
    /// started/ended a drag.
    pub fn handle_event(&mut self, camera: &mut CameraPersp, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerButton(PointerButtonEvent { button, state, x, y, .. }) => {
                match state {
                    MouseButtonState::Pressed => {
                        let Some(mode) = drag_mode(*button) else { return false };
                        self.drag = Some(mode);
                        self.last_pos = Some((*x, *y));
                        true
                    }
                    MouseButtonState::Released => {
                        if self.drag.is_some_and(|d| Some(d) == drag_mode(*button)) {
                            self.drag = None;
                            return true;
                        }
                        false
                    }
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                let prev = self.last_pos.replace((*x, *y));
                let (Some(mode), Some((px, py))) = (self.drag, prev) else { return false };
                let (dx, dy) = (x - px, y - py);
                match mode {
                    Drag::Tumble => self.tumble(camera, dx, dy),
                    Drag::Pan => self.pan(camera, dx, dy),
                    Drag::Dolly => self.dolly(camera, -dy / 10.0),
                }
                true
            }

            InputEvent::MouseWheel { delta, .. } => {
                self.dolly(camera, delta.lines_y());
                true
            }

            InputEvent::Focused(false) | InputEvent::PointerLeft => {
                self.drag = None;
                self.last_pos = None;
                false
            }

            _ => false,
        }
    }

    /// Orbits the eye around the target. `dx` yaws about world up, `dy` pitches.
    pub fn tumble(&self, camera: &mut CameraPersp, dx: f32, dy: f32) {
        let offset = camera.eye - camera.target;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return;
        }

        let yaw = offset.x.atan2(offset.z) - dx * self.tumble_speed;
        let pitch = ((offset.y / distance).clamp(-1.0, 1.0).asin() + dy * self.tumble_speed)
            .clamp(-MAX_PITCH, MAX_PITCH);

        let dir = Vec3::new(pitch.cos() * yaw.sin(), pitch.sin(), pitch.cos() * yaw.cos());
        camera.look_at(camera.target + dir * distance, camera.target);
    }

    /// Translates eye and target in the view plane, scaled by the eye distance.
    pub fn pan(&self, camera: &mut CameraPersp, dx: f32, dy: f32) {
        let forward = camera.forward();
        let right = forward.cross(Vec3::Y).normalize_or(Vec3::X);
        let up = right.cross(forward);

        let scale = self.pan_speed * camera.distance();
        let shift = (right * -dx + up * dy) * scale;
        camera.eye += shift;
        camera.target += shift;
    }

    /// Moves the eye along the view direction. Positive `amount` moves closer.
    pub fn dolly(&self, camera: &mut CameraPersp, amount: f32) {
        let distance = (camera.distance() * (-amount * self.dolly_speed).exp())
            .clamp(self.min_distance, self.max_distance);
        camera.eye = camera.target - camera.forward() * distance;
    }
}

fn drag_mode(button: MouseButton) -> Option<Drag> {
    match button {
        MouseButton::Left => Some(Drag::Tumble),
        MouseButton::Middle => Some(Drag::Pan),
        MouseButton::Right => Some(Drag::Dolly),
        _ => None,
    }
}
