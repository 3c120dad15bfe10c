use std::sync::Arc;

use pixels::{Pixels, SurfaceTexture, TextureError};
use thiserror::Error;
use winit::dpi::PhysicalPosition;
use winit::window::Window;

use crate::app::Vec2;

use super::draw::{rasterize, DrawList};

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("failed to create pixel surface: {0}")]
    Create(#[source] pixels::Error),
    #[error("failed to resize pixel surface to {width}x{height}: {source}")]
    Resize {
        width: u32,
        height: u32,
        #[source]
        source: TextureError,
    },
    #[error("failed to present frame: {0}")]
    Present(#[source] pixels::Error),
}

/// Fixed-resolution framebuffer scaled onto the window surface.
pub(crate) struct Renderer {
    pixels: Pixels<'static>,
    buffer_width: u32,
    buffer_height: u32,
}

impl Renderer {
    pub(crate) fn new(
        window: Arc<Window>,
        buffer_width: u32,
        buffer_height: u32,
    ) -> Result<Self, RendererError> {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width, size.height, window);
        let pixels =
            Pixels::new(buffer_width, buffer_height, surface).map_err(RendererError::Create)?;
        Ok(Self {
            pixels,
            buffer_width,
            buffer_height,
        })
    }

    pub(crate) fn resize(&mut self, width: u32, height: u32) -> Result<(), RendererError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels
            .resize_surface(width, height)
            .map_err(|source| RendererError::Resize {
                width,
                height,
                source,
            })
    }

    /// Maps a physical window position to framebuffer pixels, `None` outside the buffer.
    pub(crate) fn window_to_buffer_px(&self, position: PhysicalPosition<f64>) -> Option<Vec2> {
        self.pixels
            .window_pos_to_pixel((position.x as f32, position.y as f32))
            .ok()
            .map(|(x, y)| Vec2 {
                x: x as f32,
                y: y as f32,
            })
    }

    pub(crate) fn render(&mut self, frame: &DrawList) -> Result<(), RendererError> {
        rasterize(
            self.pixels.frame_mut(),
            self.buffer_width,
            self.buffer_height,
            frame.commands(),
        );
        self.pixels.render().map_err(RendererError::Present)
    }
}
