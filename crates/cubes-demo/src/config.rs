use std::path::PathBuf;

use cubes_engine::device::GpuInit;
use cubes_engine::logging::LoggingConfig;
use cubes_engine::window::RuntimeConfig;

/// Texture used when neither the command line nor the environment name one.
pub const DEFAULT_TEXTURE_PATH: &str = "assets/texture.png";

/// Environment variable overriding the texture path.
pub const TEXTURE_ENV: &str = "CUBES_TEXTURE";

/// Everything the demo needs before the window opens.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub runtime: RuntimeConfig,
    pub gpu: GpuInit,
    pub logging: LoggingConfig,
    pub texture_path: PathBuf,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            runtime: RuntimeConfig::default(),
            gpu: GpuInit::default(),
            logging: LoggingConfig::default(),
            texture_path: PathBuf::from(DEFAULT_TEXTURE_PATH),
        }
    }
}

impl DemoConfig {
    /// Defaults, with the texture path taken from the process arguments or environment.
    pub fn from_env() -> Self {
        let arg = std::env::args_os().nth(1).map(PathBuf::from);
        let env = std::env::var_os(TEXTURE_ENV).map(PathBuf::from);
        Self::default().with_texture_override(arg, env)
    }

    /// First argument wins over the environment; empty values are ignored.
    fn with_texture_override(mut self, arg: Option<PathBuf>, env: Option<PathBuf>) -> Self {
        if let Some(path) = arg.into_iter().chain(env).find(|p| !p.as_os_str().is_empty()) {
            self.texture_path = path;
        }
        self
    }
}
