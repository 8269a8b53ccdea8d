//! Asset loading that runs off the render thread.

mod decode;
mod loader;

pub use decode::{TextureError, TextureImage};
pub use loader::{LoadState, TextureLoader};
