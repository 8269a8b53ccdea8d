//! GPU rendering subsystem.
//!
//! Renderers turn `scene` frames into GPU commands via wgpu.
//! Each renderer is responsible for its own GPU resources (pipelines, buffers).
//!
//! Convention:
//! - world space is right-handed, +Y up, camera looking down -Z
//! - clip depth is wgpu's `[0, 1]`; the frame is cleared to depth `1.0`

mod ctx;
pub mod cube;
pub mod shader;
mod texture;

pub use ctx::{RenderCtx, RenderTarget};
pub use cube::{cube_program, CubeRenderer};
pub use shader::{validate_program, LinkError, ProgramDesc, ShaderError};
