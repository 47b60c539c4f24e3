use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::{CanvasSize, PointPx, RectPx, Rgb8};
use crate::foundation::error::{TorsoError, TorsoResult};

/// A finished slide as opaque RGB8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlideImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGB8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl SlideImage {
    /// Solid-color image.
    pub fn filled(size: CanvasSize, color: Rgb8) -> Self {
        let px = (size.width as usize) * (size.height as usize);
        let mut data = Vec::with_capacity(px * 3);
        for _ in 0..px {
            data.extend_from_slice(&[color.r, color.g, color.b]);
        }
        Self {
            width: size.width,
            height: size.height,
            data,
        }
    }

    pub fn size(&self) -> CanvasSize {
        CanvasSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Color at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 3;
        Some(Rgb8::new(self.data[i], self.data[i + 1], self.data[i + 2]))
    }

    /// Convert into an `image` buffer for PNG output and inspection.
    pub fn to_rgb_image(&self) -> TorsoResult<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.data.clone()).ok_or_else(|| {
            TorsoError::validation(format!(
                "slide data length {} does not match {}x{} rgb8",
                self.data.len(),
                self.width,
                self.height
            ))
        })
    }

    pub fn save_png(&self, path: &Path) -> TorsoResult<()> {
        let img = self.to_rgb_image()?;
        img.save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// Rendered size of a single line of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextExtent {
    pub width: f64,
    pub height: f64,
}

/// Measures caption text in the currently loaded font.
pub trait TextMeasurer {
    /// Load (or reuse) the font at `path` at `size_px`. Missing or unreadable files are resource
    /// errors.
    fn load_font(&mut self, path: &Path, size_px: f32) -> TorsoResult<()>;

    /// Extent of `text` laid out on one line with the loaded font.
    fn measure_text(&mut self, text: &str) -> TorsoResult<TextExtent>;
}

/// Raster target the slide renderer paints into.
///
/// Call order per slide: `begin`, any number of `fill_rect`/`draw_text`, then `finish`. Later
/// draws paint over earlier ones.
pub trait Canvas: TextMeasurer {
    fn begin(&mut self, size: CanvasSize, background: Rgb8) -> TorsoResult<()>;

    fn fill_rect(&mut self, rect: RectPx, color: Rgb8) -> TorsoResult<()>;

    /// Draw `text` with the top-left of its layout box at `origin`.
    fn draw_text(&mut self, text: &str, origin: PointPx, color: Rgb8) -> TorsoResult<()>;

    fn finish(&mut self) -> TorsoResult<SlideImage>;
}
