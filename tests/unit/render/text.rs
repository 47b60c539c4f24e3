use super::*;

fn system_font() -> Option<std::path::PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/Library/Fonts/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .map(std::path::PathBuf::from)
    .find(|p| p.is_file())
}

#[test]
fn layout_rejects_non_positive_size() {
    let mut engine = TextLayoutEngine::new();
    let err = engine
        .layout_line("x", "sans-serif", 0.0, TextBrushRgba8::default())
        .err().unwrap();
    assert!(err.is_validation());
}

#[test]
fn garbage_bytes_register_no_family() {
    let mut engine = TextLayoutEngine::new();
    assert!(engine.register_font(b"not a font").is_err());
}

#[test]
fn extent_height_is_first_line_ascent_plus_descent() {
    let Some(font) = system_font() else {
        eprintln!("skipping: no system TrueType font found");
        return;
    };
    let bytes = std::fs::read(&font).unwrap();
    let mut engine = TextLayoutEngine::new();
    let family = engine.register_font(&bytes).unwrap();
    let layout = engine
        .layout_line(
            "aqua.flv - slide 0001",
            &family,
            24.0,
            TextBrushRgba8::default(),
        )
        .unwrap();

    let line = layout.lines().next().unwrap();
    let m = line.metrics();
    let extent = layout_extent(&layout);

    assert!((extent.height - f64::from(m.ascent + m.descent)).abs() < 1e-6);
    assert!((extent.width - f64::from(m.advance)).abs() < 1e-6);
    assert!(extent.width > 0.0);
}
