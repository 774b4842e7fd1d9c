use std::path::Path;

use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;

/// Pixel density used for figure sizes given in inches.
pub const DEFAULT_DPI: u32 = 150;

/// Off-screen RGB canvas. Plotters draws into the buffer; the `image` crate
/// encodes it.
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * 3],
        }
    }

    /// Canvas for a `width_in` × `height_in` inch figure at `dpi`.
    pub fn from_inches(width_in: f64, height_in: f64, dpi: u32) -> Self {
        let px = |inches: f64| (inches * dpi as f64).round().max(1.0) as u32;
        Self::new(px(width_in), px(height_in))
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Clear to white, run `paint`, and flush the backend into the buffer.
    pub fn draw<F>(&mut self, paint: F) -> Result<()>
    where
        F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<()>,
    {
        let root = BitMapBackend::with_buffer(&mut self.pixels, (self.width, self.height))
            .into_drawing_area();
        root.fill(&WHITE)?;
        paint(&root)?;
        root.present()?;
        Ok(())
    }

    /// Encode as PNG; the format follows the path's extension.
    pub fn save_png(self, path: &Path) -> Result<()> {
        let image = image::RgbImage::from_raw(self.width, self.height, self.pixels)
            .context("canvas buffer does not match its dimensions")?;
        image
            .save(path)
            .with_context(|| format!("writing {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inch_sizing() {
        let r = Raster::from_inches(12.0, 6.0, DEFAULT_DPI);
        assert_eq!(r.size(), (1800, 900));
    }

    #[test]
    fn test_save_blank_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.png");
        let mut r = Raster::new(8, 4);
        r.draw(|_| Ok(())).unwrap();
        r.save_png(&path).unwrap();
        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (8, 4));
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255]);
    }
}
