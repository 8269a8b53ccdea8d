mod config;

use anyhow::Result;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use cubes_engine::assets::TextureLoader;
use cubes_engine::core::{App, AppControl, FrameCtx};
use cubes_engine::logging::init_logging;
use cubes_engine::paint::Color;
use cubes_engine::render::{cube_program, validate_program, CubeRenderer};
use cubes_engine::window::Runtime;

use config::DemoConfig;

/// Background gray, sRGB-encoded.
const CLEAR_SRGB: f32 = 0.1;

fn clear_color() -> Color {
    Color::from_srgb(CLEAR_SRGB, CLEAR_SRGB, CLEAR_SRGB)
}

/// Two spinning cubes. The renderer is built on the first frame, once a GPU
/// context exists.
struct CubesApp {
    clear: Color,
    texture_loader: Option<TextureLoader>,
    renderer: Option<CubeRenderer>,
}

impl CubesApp {
    fn new(texture_loader: TextureLoader) -> Self {
        Self {
            clear: clear_color(),
            texture_loader: Some(texture_loader),
            renderer: None,
        }
    }
}

impl App for CubesApp {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                log::info!("escape pressed, exiting");
                AppControl::Exit
            }
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.renderer.is_none() {
            let Some(loader) = self.texture_loader.take() else {
                return AppControl::Exit;
            };
            match CubeRenderer::new(&ctx.render_ctx(), loader) {
                Ok(renderer) => self.renderer = Some(renderer),
                Err(e) => {
                    log::error!("failed to build cube renderer: {e}");
                    return AppControl::Exit;
                }
            }
        }

        let Some(renderer) = self.renderer.as_mut() else {
            return AppControl::Exit;
        };

        let elapsed = ctx.time.elapsed;
        ctx.render(self.clear, |rctx, target| {
            renderer.render(rctx, target, elapsed);
        })
    }
}

fn main() -> Result<()> {
    let config = DemoConfig::from_env();
    init_logging(config.logging.clone());

    // Shader problems abort before any window exists.
    validate_program(&cube_program())?;

    log::info!("texture: {}", config.texture_path.display());
    let app = CubesApp::new(TextureLoader::spawn(&config.texture_path));

    Runtime::run(config.runtime, config.gpu, app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_color_is_linear_dark_gray() {
        let c = clear_color();
        // sRGB 0.1 (26/255 on screen) is about 0.01 in linear space.
        assert!((c.r - 0.01).abs() < 1e-3, "{}", c.r);
        assert_eq!((c.g, c.b, c.a), (c.r, c.r, 1.0));
    }
}
