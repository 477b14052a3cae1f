use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};

/// Perspective camera defined by eye position, look-at target, and projection
/// parameters.
///
/// Projection is right-handed with a `[0, 1]` depth range (wgpu convention).
#[derive(Debug, Clone, PartialEq)]
pub struct CameraPersp {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction hint; need not be orthogonal to the view direction.
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraPersp {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_degrees: 60.0,
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl CameraPersp {
    /// Creates a camera for a `width` x `height` viewport.
    pub fn new(width: u32, height: u32, fov_y_degrees: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            fov_y_degrees,
            near,
            far,
            ..Self::default()
        };
        cam.set_aspect_from_size(width, height);
        cam
    }

    /// Places the eye and points it at `target`, keeping world +Y as up.
    pub fn look_at(&mut self, eye: Vec3, target: Vec3) {
        self.eye = eye;
        self.target = target;
        self.up = Vec3::Y;
    }

    pub fn set_aspect_from_size(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    /// Unit vector from the eye toward the target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or(Vec3::NEG_Z)
    }

    /// Eye-to-target distance.
    pub fn distance(&self) -> f32 {
        self.eye.distance(self.target)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Inverse-transpose of the view matrix's upper 3x3, for eye-space normals.
    pub fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(self.view_matrix()).inverse().transpose()
    }

    /// Matrices in the layout expected by shader uniform blocks.
    pub fn uniforms(&self) -> CameraUniforms {
        CameraUniforms {
            view_proj: self.view_projection().to_cols_array_2d(),
            normal_matrix: Mat4::from_mat3(self.normal_matrix()).to_cols_array_2d(),
        }
    }
}

/// GPU uniform block holding the camera matrices (128 bytes).
///
/// `normal_matrix` is stored as a full 4x4 to sidestep `mat3x3` padding rules.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct CameraUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
}

impl Default for CameraUniforms {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            normal_matrix: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn camera() -> CameraPersp {
        let mut cam = CameraPersp::new(1000, 1000, 60.0, 0.1, 1000.0);
        cam.look_at(Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO);
        cam
    }

    #[test]
    fn aspect_from_size_guards_zero_height() {
        let mut cam = CameraPersp::default();
        cam.set_aspect_from_size(800, 0);
        assert_eq!(cam.aspect, 800.0);
        cam.set_aspect_from_size(1600, 800);
        assert_eq!(cam.aspect, 2.0);
    }

    #[test]
    fn target_projects_to_screen_center() {
        let cam = camera();
        let clip = cam.view_projection() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn point_behind_eye_is_outside_depth_range() {
        let cam = camera();
        let clip = cam.view_projection() * Vec4::new(0.0, 0.0, 30.0, 1.0);
        assert!(clip.w < 0.0);
    }

    #[test]
    fn normal_matrix_of_rigid_view_is_its_rotation() {
        let mut cam = camera();
        cam.look_at(Vec3::new(7.0, 3.0, -4.0), Vec3::new(1.0, 0.0, 2.0));
        let rot = Mat3::from_mat4(cam.view_matrix());
        let n = cam.normal_matrix();
        assert!(n.abs_diff_eq(rot, 1e-5));
    }

    #[test]
    fn uniforms_are_finite() {
        let u = camera().uniforms();
        assert!(u.view_proj.iter().flatten().all(|v| v.is_finite()));
        assert!(u.normal_matrix.iter().flatten().all(|v| v.is_finite()));
        assert_eq!(std::mem::size_of::<CameraUniforms>(), 128);
    }

    #[test]
    fn forward_and_distance() {
        let cam = camera();
        assert!(cam.forward().abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert_eq!(cam.distance(), 20.0);
    }
}
