use glam::{Mat4, Vec3};

/// Fixed perspective camera.
///
/// Both matrices are computed once at construction; the camera never moves and
/// keeps the aspect ratio it was created with.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    projection: Mat4,
    view: Mat4,
}

/// Camera placement and lens parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraDesc {
    pub fov_y_radians: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self {
            fov_y_radians: 45.0_f32.to_radians(),
            z_near: 0.1,
            z_far: 100.0,
            eye: Vec3::new(0.0, 0.0, 7.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

impl Camera {
    /// Builds the camera for a surface of the given aspect ratio (width / height).
    ///
    /// Non-finite or non-positive aspect ratios fall back to `1.0`.
    pub fn new(desc: CameraDesc, aspect: f32) -> Self {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        Self {
            projection: Mat4::perspective_rh(desc.fov_y_radians, aspect, desc.z_near, desc.z_far),
            view: Mat4::look_at_rh(desc.eye, desc.target, desc.up),
        }
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    /// `projection * view`, shared by every object in the frame.
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_lands_in_front_of_camera() {
        let cam = Camera::new(CameraDesc::default(), 16.0 / 9.0);
        let clip = cam.view_projection() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        // wgpu clip depth is [0, 1].
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn view_moves_eye_to_origin() {
        let cam = Camera::new(CameraDesc::default(), 1.0);
        let eye = cam.view().transform_point3(Vec3::new(0.0, 0.0, 7.0));
        assert!(eye.abs_diff_eq(Vec3::ZERO, 1e-6));
    }

    #[test]
    fn bad_aspect_falls_back_to_square() {
        let square = Camera::new(CameraDesc::default(), 1.0);
        assert_eq!(Camera::new(CameraDesc::default(), 0.0), square);
        assert_eq!(Camera::new(CameraDesc::default(), f32::NAN), square);
    }

    #[test]
    fn projection_depends_on_aspect_only_through_x_scale() {
        let wide = Camera::new(CameraDesc::default(), 2.0).projection();
        let square = Camera::new(CameraDesc::default(), 1.0).projection();
        assert!((wide.x_axis.x * 2.0 - square.x_axis.x).abs() < 1e-6);
        assert_eq!(wide.y_axis, square.y_axis);
        assert_eq!(wide.z_axis, square.z_axis);
    }
}
