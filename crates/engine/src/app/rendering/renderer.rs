use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::world::Level;

use super::scene_renderer::SceneRenderer;
use super::surface::FrameBuffer;
use super::Viewport;

/// Window-backed presenter: owns the `pixels` surface and hands its frame to
/// the scene renderer as a [`FrameBuffer`].
pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub fn render(&mut self, scene: &SceneRenderer, level: &mut Level) -> Result<(), Error> {
        let viewport = self.viewport;
        let mut frame = FrameBuffer::new(self.pixels.frame_mut(), viewport.width, viewport.height);
        scene.draw(&mut frame, level, viewport);
        self.pixels.render()
    }
}
