use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use super::frame::{Frame, PALETTE};

/// Presents the paletted logical frame through a pixels surface; the GPU
/// side scales the logical resolution up to whatever the window size is.
pub(crate) struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    logical_width: u32,
    logical_height: u32,
}

impl Renderer {
    pub(crate) fn new(
        window: Arc<Window>,
        logical_width: u32,
        logical_height: u32,
    ) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(
            Arc::clone(&window),
            logical_width,
            logical_height,
            size.width,
            size.height,
        )?;
        Ok(Self {
            window,
            pixels,
            logical_width,
            logical_height,
        })
    }

    pub(crate) fn resize(&mut self, surface_width: u32, surface_height: u32) -> Result<(), Error> {
        if surface_width == 0 || surface_height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(
            Arc::clone(&self.window),
            self.logical_width,
            self.logical_height,
            surface_width,
            surface_height,
        )?;
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        logical_width: u32,
        logical_height: u32,
        surface_width: u32,
        surface_height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(surface_width, surface_height, window);
        Pixels::new(logical_width, logical_height, surface)
    }

    pub(crate) fn present(&mut self, frame: &Frame) -> Result<(), Error> {
        let target = self.pixels.frame_mut();
        for (pixel, &index) in target.chunks_exact_mut(4).zip(frame.indices()) {
            pixel.copy_from_slice(&PALETTE[index as usize % PALETTE.len()]);
        }
        self.pixels.render()
    }
}
