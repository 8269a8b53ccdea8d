use glam::{Mat4, Vec3};

use super::camera::Camera;
use super::mesh::{self, VERTEX_COUNT};

/// Placement and rotation rates of one cube.
///
/// The model transform is rebuilt from scratch for every `elapsed` value:
/// `translate(offset) * rotate_y(yaw_rate * t) * rotate_x(pitch_rate * t)`.
/// Rotation therefore happens about the cube's own center after translation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Spin {
    pub offset: Vec3,
    /// Radians per second around Y.
    pub yaw_rate: f32,
    /// Radians per second around X.
    pub pitch_rate: f32,
}

impl Spin {
    pub const LEFT: Spin = Spin {
        offset: Vec3::new(-2.0, 0.0, 0.0),
        yaw_rate: 1.0,
        pitch_rate: 0.7,
    };

    pub const RIGHT: Spin = Spin {
        offset: Vec3::new(2.0, 0.0, 0.0),
        yaw_rate: -1.0,
        pitch_rate: 0.5,
    };

    #[inline]
    pub fn yaw(&self, elapsed: f32) -> f32 {
        self.yaw_rate * elapsed
    }

    #[inline]
    pub fn pitch(&self, elapsed: f32) -> f32 {
        self.pitch_rate * elapsed
    }

    pub fn model(&self, elapsed: f32) -> Mat4 {
        Mat4::from_translation(self.offset)
            * Mat4::from_rotation_y(self.yaw(elapsed))
            * Mat4::from_rotation_x(self.pitch(elapsed))
    }
}

/// How a cube's fragments are colored.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Shading {
    /// Interpolated per-vertex color.
    VertexColor,
    /// Sampled from the shared texture.
    Texture,
}

impl Shading {
    #[inline]
    pub fn uses_texture(self) -> bool {
        self == Shading::Texture
    }
}

/// One of the two cubes. Shares the mesh with the other; owns its colors and transform.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub label: &'static str,
    pub spin: Spin,
    pub shading: Shading,
    pub colors: [[f32; 4]; VERTEX_COUNT],
    model: Mat4,
}

impl SceneObject {
    pub fn new(
        label: &'static str,
        spin: Spin,
        shading: Shading,
        colors: [[f32; 4]; VERTEX_COUNT],
    ) -> Self {
        Self {
            label,
            spin,
            shading,
            colors,
            model: spin.model(0.0),
        }
    }

    /// Model transform from the most recent [`CubeScene::frame`] call.
    pub fn model(&self) -> Mat4 {
        self.model
    }
}

/// Per-object values consumed by the renderer for one frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ObjectFrame {
    pub model: Mat4,
    /// `projection * view * model`.
    pub mvp: Mat4,
    pub use_texture: bool,
}

/// The fixed two-cube scene: a flat-colored cube on the left and a textured one
/// on the right, seen by one static camera.
#[derive(Debug, Clone)]
pub struct CubeScene {
    camera: Camera,
    objects: [SceneObject; 2],
}

impl CubeScene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            objects: [
                SceneObject::new("flat cube", Spin::LEFT, Shading::VertexColor, mesh::flat_colors()),
                SceneObject::new("textured cube", Spin::RIGHT, Shading::Texture, mesh::white_colors()),
            ],
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn objects(&self) -> &[SceneObject; 2] {
        &self.objects
    }

    /// Recomputes both model transforms for `elapsed` seconds and returns what
    /// each draw needs. The result depends only on `elapsed`.
    pub fn frame(&mut self, elapsed: f32) -> [ObjectFrame; 2] {
        let view_projection = self.camera.view_projection();

        self.objects.each_mut().map(|obj| {
            obj.model = obj.spin.model(elapsed);
            ObjectFrame {
                model: obj.model,
                mvp: view_projection * obj.model,
                use_texture: obj.shading.uses_texture(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::CameraDesc;

    fn scene() -> CubeScene {
        CubeScene::new(Camera::new(CameraDesc::default(), 4.0 / 3.0))
    }

    // ── model transforms ──────────────────────────────────────────────────

    #[test]
    fn left_cube_translation_is_fixed() {
        for t in [0.0, 0.3, 1.0, 17.5, 1234.0] {
            let m = Spin::LEFT.model(t);
            assert!(m.w_axis.truncate().abs_diff_eq(Vec3::new(-2.0, 0.0, 0.0), 1e-5));
        }
    }

    #[test]
    fn rotation_is_about_local_origin() {
        // The cube center stays at the offset whatever the rotation.
        let center = Spin::RIGHT.model(2.7).transform_point3(Vec3::ZERO);
        assert!(center.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn rotation_order_is_yaw_then_pitch() {
        let t = 0.8;
        let expected = Mat4::from_translation(Spin::LEFT.offset)
            * Mat4::from_rotation_y(t)
            * Mat4::from_rotation_x(0.7 * t);
        assert!(Spin::LEFT.model(t).abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn right_cube_yaw_mirrors_left() {
        for t in [0.0, 0.5, 3.0, -2.0] {
            assert_eq!(Spin::RIGHT.yaw(t), -Spin::LEFT.yaw(t));
        }
    }

    // ── frame ─────────────────────────────────────────────────────────────

    #[test]
    fn frame_is_pure_in_elapsed() {
        let mut s = scene();
        let a = s.frame(4.2);
        s.frame(9.0);
        let b = s.frame(4.2);
        assert_eq!(a, b);
    }

    #[test]
    fn zero_elapsed_is_pure_translation() {
        let mut s = scene();
        let [left, right] = s.frame(0.0);
        assert_eq!(left.model, Mat4::from_translation(Vec3::new(-2.0, 0.0, 0.0)));
        assert_eq!(right.model, Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)));

        let cam = s.camera();
        let expected = cam.projection() * cam.view() * Mat4::from_translation(Vec3::new(-2.0, 0.0, 0.0));
        assert!(left.mvp.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn frame_updates_object_models() {
        let mut s = scene();
        let [left, right] = s.frame(1.25);
        assert_eq!(s.objects()[0].model(), left.model);
        assert_eq!(s.objects()[1].model(), right.model);
    }

    #[test]
    fn only_right_cube_is_textured() {
        let mut s = scene();
        let [left, right] = s.frame(1.0);
        assert!(!left.use_texture);
        assert!(right.use_texture);
        assert_eq!(s.objects()[0].colors, mesh::flat_colors());
        assert_eq!(s.objects()[1].colors, mesh::white_colors());
    }
}
