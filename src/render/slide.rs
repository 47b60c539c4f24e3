use crate::foundation::core::{CanvasSize, PointPx, RectPx, Rgb8};
use crate::foundation::error::TorsoResult;
use crate::foundation::random::RandomSource;
use crate::model::{CAPTION_MARGIN_PX, MIN_RECT_SIDE, SlideSpec};
use crate::render::backend::{Canvas, SlideImage};

pub const BACKGROUND: Rgb8 = Rgb8::WHITE;
/// Drawn first.
pub const FIRST_RECT_COLOR: Rgb8 = Rgb8::BLUE;
/// Drawn second, on top of the first.
pub const SECOND_RECT_COLOR: Rgb8 = Rgb8::RED;
pub const CAPTION_COLOR: Rgb8 = Rgb8::BLACK;

/// A rendered slide plus the random geometry that went into it.
#[derive(Clone, Debug)]
pub struct RenderedSlide {
    pub image: SlideImage,
    /// `[blue, red]` in draw order.
    pub rects: [RectPx; 2],
    pub caption: String,
    pub caption_origin: PointPx,
}

/// Random rectangle with sides in `[50, side/2]`, placed fully inside `canvas`.
///
/// Draw order from `rng` is width, height, x, y.
pub fn random_rect(canvas: CanvasSize, rng: &mut dyn RandomSource) -> TorsoResult<RectPx> {
    let width = rng.int_inclusive(MIN_RECT_SIDE, canvas.width / 2)?;
    let height = rng.int_inclusive(MIN_RECT_SIDE, canvas.height / 2)?;
    let x = rng.int_inclusive(0, canvas.width - width)?;
    let y = rng.int_inclusive(0, canvas.height - height)?;
    Ok(RectPx {
        x,
        y,
        width,
        height,
    })
}

/// Caption position: left margin, and the text box's bottom one margin above the canvas bottom.
pub fn caption_origin(canvas: CanvasSize, text_height: f64) -> PointPx {
    let margin = f64::from(CAPTION_MARGIN_PX);
    PointPx::new(margin, f64::from(canvas.height) - text_height - margin)
}

/// Render one slide: white background, a blue then a red random rectangle, and the caption in
/// the bottom-left corner.
#[tracing::instrument(level = "debug", skip_all, fields(index = spec.index))]
pub fn render_slide(
    spec: &SlideSpec,
    canvas: &mut dyn Canvas,
    rng: &mut dyn RandomSource,
) -> TorsoResult<RenderedSlide> {
    spec.validate()?;
    canvas.load_font(&spec.font_path, spec.font_size as f32)?;

    let size = spec.canvas();
    canvas.begin(size, BACKGROUND)?;

    let first = random_rect(size, rng)?;
    canvas.fill_rect(first, FIRST_RECT_COLOR)?;
    let second = random_rect(size, rng)?;
    canvas.fill_rect(second, SECOND_RECT_COLOR)?;

    let caption = spec.caption();
    let extent = canvas.measure_text(&caption)?;
    let origin = caption_origin(size, extent.height);
    canvas.draw_text(&caption, origin, CAPTION_COLOR)?;

    let image = canvas.finish()?;
    tracing::debug!(?first, ?second, caption = %caption, "rendered slide");

    Ok(RenderedSlide {
        image,
        rects: [first, second],
        caption,
        caption_origin: origin,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/slide.rs"]
mod tests;
