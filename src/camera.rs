//! Camera state and derived view/projection matrices

use crate::math::{Mat4, Vec3};

const MOVE_SPEED: f32 = 5.0;
const ROTATION_SPEED: f32 = 100.0;
const NEAR_PLANE: f32 = 1.0;
const FAR_PLANE: f32 = 100.0;
const PITCH_LIMIT: f32 = 89.0;

/// One frame's worth of movement and rotation deltas, normalized to
/// roughly [-1, 1] per axis. How these are produced (keyboard, mouse,
/// replay file) is the embedding app's concern.
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraInput {
    /// Positive moves along the camera's forward vector
    pub forward: f32,
    /// Positive strafes along the camera's right vector
    pub strafe: f32,
    /// Positive turns right
    pub yaw: f32,
    /// Positive looks down
    pub pitch: f32,
}

/// Free camera with yaw/pitch orientation.
///
/// `view_matrix` maps world to camera space and feeds the composed
/// world-view-projection transform; `inv_view_matrix` is its inverse
/// (camera to world). Yaw and pitch accumulate in degrees, as does the
/// field-of-view angle.
#[derive(Debug, Clone)]
pub struct Camera {
    pub origin: Vec3,
    fov_angle: f32,
    fov_scale: f32,
    aspect_ratio: f32,
    total_yaw: f32,
    total_pitch: f32,
    pub view_matrix: Mat4,
    pub inv_view_matrix: Mat4,
    pub projection_matrix: Mat4,
}

impl Camera {
    pub fn new(fov_angle: f32, origin: Vec3, aspect_ratio: f32) -> Self {
        let fov_scale = (fov_angle.to_radians() / 2.0).tan();
        let mut camera = Self {
            origin,
            fov_angle,
            fov_scale,
            aspect_ratio,
            total_yaw: 0.0,
            total_pitch: 0.0,
            view_matrix: Mat4::IDENTITY,
            inv_view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::perspective_fov_lh(fov_scale, aspect_ratio, NEAR_PLANE, FAR_PLANE),
        };
        camera.update_view_matrix();
        camera
    }

    /// Apply one frame of input: translate along the current basis, then
    /// accumulate yaw/pitch (pitch clamped to keep the camera from
    /// flipping) and rebuild the view matrices.
    pub fn update(&mut self, delta_time: f32, input: &CameraInput) {
        let rotation = self.rotation_matrix();
        let forward = rotation.transform_vector(Vec3::UNIT_Z);
        let right = rotation.transform_vector(Vec3::UNIT_X);

        let movement = forward * input.forward + right * input.strafe;
        self.origin += movement * (MOVE_SPEED * delta_time);

        self.total_yaw += input.yaw * ROTATION_SPEED * delta_time;
        self.total_pitch = (self.total_pitch + input.pitch * ROTATION_SPEED * delta_time)
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);

        self.update_view_matrix();
    }

    /// Change the field of view; the projection matrix is rebuilt only when
    /// the angle actually changes.
    pub fn set_fov(&mut self, fov_angle: f32) {
        if (fov_angle - self.fov_angle).abs() < f32::EPSILON {
            return;
        }
        self.fov_angle = fov_angle;
        self.fov_scale = (fov_angle.to_radians() / 2.0).tan();
        self.update_projection_matrix();
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        if (aspect_ratio - self.aspect_ratio).abs() < f32::EPSILON {
            return;
        }
        self.aspect_ratio = aspect_ratio;
        self.update_projection_matrix();
    }

    pub fn fov_angle(&self) -> f32 {
        self.fov_angle
    }

    pub fn total_pitch(&self) -> f32 {
        self.total_pitch
    }

    pub fn total_yaw(&self) -> f32 {
        self.total_yaw
    }

    fn rotation_matrix(&self) -> Mat4 {
        Mat4::rotation_x(self.total_pitch.to_radians()) * Mat4::rotation_y(self.total_yaw.to_radians())
    }

    fn update_view_matrix(&mut self) {
        self.inv_view_matrix = self.rotation_matrix() * Mat4::translation(self.origin);
        self.view_matrix = self.inv_view_matrix.inverse();
    }

    fn update_projection_matrix(&mut self) {
        self.projection_matrix =
            Mat4::perspective_fov_lh(self.fov_scale, self.aspect_ratio, NEAR_PLANE, FAR_PLANE);
    }
}
