//! Cubes engine crate.
//!
//! Owns the platform + GPU runtime pieces and the two-cube scene and renderer
//! driven by the `cubes-demo` binary.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod scene;
pub mod assets;
