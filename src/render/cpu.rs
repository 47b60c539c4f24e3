use std::path::{Path, PathBuf};

use crate::foundation::core::{CanvasSize, PointPx, RectPx, Rgb8};
use crate::foundation::error::{TorsoError, TorsoResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::backend::{Canvas, SlideImage, TextExtent, TextMeasurer};
use crate::render::text::{TextBrushRgba8, TextLayoutEngine, layout_extent};

/// CPU rasterizer: `vello_cpu` for fills and glyphs, Parley for shaping and measurement.
pub struct CpuCanvas {
    text: TextLayoutEngine,
    font: Option<LoadedFont>,
    frame: Option<CpuFrame>,
}

struct LoadedFont {
    path: PathBuf,
    size_px: f32,
    family: String,
    data: vello_cpu::peniko::FontData,
}

struct CpuFrame {
    size: CanvasSize,
    background: Rgb8,
    ctx: vello_cpu::RenderContext,
}

impl Default for CpuCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuCanvas {
    pub fn new() -> Self {
        Self {
            text: TextLayoutEngine::new(),
            font: None,
            frame: None,
        }
    }

    /// Family name of the loaded font, if any.
    pub fn font_family(&self) -> Option<&str> {
        self.font.as_ref().map(|f| f.family.as_str())
    }

    fn loaded_font(&self) -> TorsoResult<&LoadedFont> {
        self.font
            .as_ref()
            .ok_or_else(|| TorsoError::validation("no font loaded; call load_font first"))
    }

    fn frame_mut(&mut self) -> TorsoResult<&mut CpuFrame> {
        self.frame
            .as_mut()
            .ok_or_else(|| TorsoError::validation("canvas not started; call begin first"))
    }
}

impl TextMeasurer for CpuCanvas {
    fn load_font(&mut self, path: &Path, size_px: f32) -> TorsoResult<()> {
        if let Some(f) = &self.font
            && f.path == path
            && f.size_px == size_px
        {
            return Ok(());
        }

        let bytes = std::fs::read(path).map_err(|e| {
            TorsoError::resource(format!("failed to read font '{}': {e}", path.display()))
        })?;
        let family = self.text.register_font(&bytes).map_err(|e| {
            TorsoError::resource(format!("unusable font '{}': {e}", path.display()))
        })?;
        let data =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);

        tracing::debug!(font = %path.display(), family = %family, size_px, "loaded font");
        self.font = Some(LoadedFont {
            path: path.to_path_buf(),
            size_px,
            family,
            data,
        });
        Ok(())
    }

    fn measure_text(&mut self, text: &str) -> TorsoResult<TextExtent> {
        let (family, size_px) = {
            let f = self.loaded_font()?;
            (f.family.clone(), f.size_px)
        };
        let layout = self
            .text
            .layout_line(text, &family, size_px, TextBrushRgba8::default())?;
        Ok(layout_extent(&layout))
    }
}

impl Canvas for CpuCanvas {
    fn begin(&mut self, size: CanvasSize, background: Rgb8) -> TorsoResult<()> {
        let (w, h) = canvas_dims_u16(size)?;
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(paint(background));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(size.width),
            f64::from(size.height),
        ));
        self.frame = Some(CpuFrame {
            size,
            background,
            ctx,
        });
        Ok(())
    }

    fn fill_rect(&mut self, rect: RectPx, color: Rgb8) -> TorsoResult<()> {
        let frame = self.frame_mut()?;
        frame.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        frame.ctx.set_paint(paint(color));
        frame.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            f64::from(rect.x),
            f64::from(rect.y),
            rect.right() as f64,
            rect.bottom() as f64,
        ));
        Ok(())
    }

    fn draw_text(&mut self, text: &str, origin: PointPx, color: Rgb8) -> TorsoResult<()> {
        let (family, size_px, font) = {
            let f = self.loaded_font()?;
            (f.family.clone(), f.size_px, f.data.clone())
        };
        let brush = TextBrushRgba8 {
            r: color.r,
            g: color.g,
            b: color.b,
            a: 255,
        };
        let layout = self.text.layout_line(text, &family, size_px, brush)?;

        let frame = self.frame_mut()?;
        frame
            .ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                frame.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                frame
                    .ctx
                    .glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        frame.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }

    fn finish(&mut self) -> TorsoResult<SlideImage> {
        let mut frame = self
            .frame
            .take()
            .ok_or_else(|| TorsoError::validation("canvas not started; call begin first"))?;
        let (w, h) = canvas_dims_u16(frame.size)?;

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        frame.ctx.flush();
        frame.ctx.render_to_pixmap(&mut pixmap);

        let src = pixmap.data_as_u8_slice();
        let mut data = vec![0u8; (frame.size.width as usize) * (frame.size.height as usize) * 3];
        flatten_premul_over_bg_to_rgb8(&mut data, src, frame.background)?;

        Ok(SlideImage {
            width: frame.size.width,
            height: frame.size.height,
            data,
        })
    }
}

fn paint(color: Rgb8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, 255)
}

fn canvas_dims_u16(size: CanvasSize) -> TorsoResult<(u16, u16)> {
    let w = u16::try_from(size.width).ok().filter(|&w| w > 0);
    let h = u16::try_from(size.height).ok().filter(|&h| h > 0);
    match (w, h) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(TorsoError::validation(format!(
            "cpu canvas size must be within 1..={} per side, got {}x{}",
            u16::MAX,
            size.width,
            size.height
        ))),
    }
}

/// Composite premultiplied RGBA8 over an opaque background into packed RGB8.
pub(crate) fn flatten_premul_over_bg_to_rgb8(
    dst_rgb: &mut [u8],
    src_premul: &[u8],
    bg: Rgb8,
) -> TorsoResult<()> {
    if !src_premul.len().is_multiple_of(4) || dst_rgb.len() / 3 != src_premul.len() / 4 {
        return Err(TorsoError::validation(
            "flatten_premul_over_bg_to_rgb8 expects matching rgba8/rgb8 buffers",
        ));
    }

    let bg_r = u16::from(bg.r);
    let bg_g = u16::from(bg.g);
    let bg_b = u16::from(bg.b);

    for (d, s) in dst_rgb.chunks_exact_mut(3).zip(src_premul.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(&s[..3]);
            continue;
        }

        let inv = 255u16 - a;
        let r = u16::from(s[0]) + mul_div255_u16(bg_r, inv);
        let g = u16::from(s[1]) + mul_div255_u16(bg_g, inv);
        let b = u16::from(s[2]) + mul_div255_u16(bg_b, inv);

        d[0] = r.min(255) as u8;
        d[1] = g.min(255) as u8;
        d[2] = b.min(255) as u8;
    }

    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
