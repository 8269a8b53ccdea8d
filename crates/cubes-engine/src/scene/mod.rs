//! CPU-side scene description: cube mesh data, camera and the two spinning objects.
//!
//! Nothing here touches the GPU; renderers consume [`ObjectFrame`]s produced by
//! [`CubeScene::frame`].

mod camera;
pub mod mesh;
mod object;

pub use camera::{Camera, CameraDesc};
pub use object::{CubeScene, ObjectFrame, SceneObject, Shading, Spin};
