use crate::foundation::error::{TorsoError, TorsoResult};
use crate::render::backend::TextExtent;

/// RGBA8 brush color carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Stateful helper for building Parley text layouts from raw font bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Register font bytes and return the primary family name they provide.
    pub fn register_font(&mut self, font_bytes: &[u8]) -> TorsoResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            TorsoError::resource("no font families registered from font bytes")
        })?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| TorsoError::resource("registered font family has no name"))?
            .to_string();
        Ok(family_name)
    }

    /// Shape and lay out `text` on a single unbounded line.
    pub fn layout_line(
        &mut self,
        text: &str,
        family_name: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> TorsoResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(TorsoError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name.to_string())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// Widest line advance by the first line's ascent + descent.
///
/// Leading is excluded so the caption's bottom edge sits on the descender line.
pub fn layout_extent(layout: &parley::Layout<TextBrushRgba8>) -> TextExtent {
    let width = layout
        .lines()
        .map(|line| f64::from(line.metrics().advance))
        .fold(0.0f64, f64::max);
    let height = layout
        .lines()
        .next()
        .map(|line| {
            let m = line.metrics();
            f64::from(m.ascent + m.descent)
        })
        .unwrap_or(0.0);
    TextExtent { width, height }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
