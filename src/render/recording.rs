use std::path::{Path, PathBuf};

use crate::foundation::core::{CanvasSize, PointPx, RectPx, Rgb8};
use crate::foundation::error::{TorsoError, TorsoResult};
use crate::render::backend::{Canvas, SlideImage, TextExtent, TextMeasurer};

/// One call received by a [`RecordingCanvas`].
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasCall {
    LoadFont { path: PathBuf, size_px: f32 },
    Begin { size: CanvasSize, background: Rgb8 },
    FillRect { rect: RectPx, color: Rgb8 },
    DrawText { text: String, origin: PointPx, color: Rgb8 },
    Finish,
}

/// Canvas for tests and debugging: records every call and never touches the filesystem.
///
/// Text extents are deterministic: `chars * size * 0.5` wide and `size` high. `finish` returns an
/// image with the background and rectangles painted; text is recorded but not rasterized.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    calls: Vec<CanvasCall>,
    size_px: Option<f32>,
    missing_fonts: bool,
    current: Option<SlideImage>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// A canvas whose `load_font` always fails as if the font file did not exist.
    pub fn with_missing_fonts() -> Self {
        Self {
            missing_fonts: true,
            ..Self::default()
        }
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> &[CanvasCall] {
        &self.calls
    }

    /// Rectangles filled so far, in draw order.
    pub fn filled_rects(&self) -> Vec<(RectPx, Rgb8)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                CanvasCall::FillRect { rect, color } => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }

    /// Texts drawn so far, in draw order.
    pub fn drawn_texts(&self) -> Vec<(String, PointPx)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                CanvasCall::DrawText { text, origin, .. } => Some((text.clone(), *origin)),
                _ => None,
            })
            .collect()
    }
}

impl TextMeasurer for RecordingCanvas {
    fn load_font(&mut self, path: &Path, size_px: f32) -> TorsoResult<()> {
        self.calls.push(CanvasCall::LoadFont {
            path: path.to_path_buf(),
            size_px,
        });
        if self.missing_fonts {
            return Err(TorsoError::resource(format!(
                "failed to read font '{}': not found",
                path.display()
            )));
        }
        self.size_px = Some(size_px);
        Ok(())
    }

    fn measure_text(&mut self, text: &str) -> TorsoResult<TextExtent> {
        let size = f64::from(
            self.size_px
                .ok_or_else(|| TorsoError::validation("no font loaded; call load_font first"))?,
        );
        Ok(TextExtent {
            width: text.chars().count() as f64 * size * 0.5,
            height: size,
        })
    }
}

impl Canvas for RecordingCanvas {
    fn begin(&mut self, size: CanvasSize, background: Rgb8) -> TorsoResult<()> {
        self.calls.push(CanvasCall::Begin { size, background });
        self.current = Some(SlideImage::filled(size, background));
        Ok(())
    }

    fn fill_rect(&mut self, rect: RectPx, color: Rgb8) -> TorsoResult<()> {
        self.calls.push(CanvasCall::FillRect { rect, color });
        let img = self
            .current
            .as_mut()
            .ok_or_else(|| TorsoError::validation("canvas not started; call begin first"))?;
        let x_end = (rect.right()).min(u64::from(img.width)) as u32;
        let y_end = (rect.bottom()).min(u64::from(img.height)) as u32;
        for y in rect.y..y_end {
            for x in rect.x..x_end {
                let i = ((y as usize) * (img.width as usize) + (x as usize)) * 3;
                img.data[i..i + 3].copy_from_slice(&[color.r, color.g, color.b]);
            }
        }
        Ok(())
    }

    fn draw_text(&mut self, text: &str, origin: PointPx, color: Rgb8) -> TorsoResult<()> {
        self.calls.push(CanvasCall::DrawText {
            text: text.to_string(),
            origin,
            color,
        });
        Ok(())
    }

    fn finish(&mut self) -> TorsoResult<SlideImage> {
        self.calls.push(CanvasCall::Finish);
        self.current
            .take()
            .ok_or_else(|| TorsoError::validation("canvas not started; call begin first"))
    }
}
