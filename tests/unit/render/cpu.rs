use super::*;

fn system_font() -> Option<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/Library/Fonts/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .find(|p| p.is_file())
}

fn size(width: u32, height: u32) -> CanvasSize {
    CanvasSize { width, height }
}

#[test]
fn flatten_premul_alpha_0_returns_bg() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 3];
    flatten_premul_over_bg_to_rgb8(&mut dst, &src, Rgb8::new(10, 20, 30)).unwrap();
    assert_eq!(dst, vec![10, 20, 30]);
}

#[test]
fn flatten_premul_alpha_255_drops_alpha() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 3];
    flatten_premul_over_bg_to_rgb8(&mut dst, &src, Rgb8::WHITE).unwrap();
    assert_eq!(dst, vec![1, 2, 3]);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let src = vec![0u8; 8];
    let mut dst = vec![0u8; 3];
    assert!(flatten_premul_over_bg_to_rgb8(&mut dst, &src, Rgb8::WHITE).is_err());
}

#[test]
fn oversized_canvas_is_rejected() {
    let mut canvas = CpuCanvas::new();
    let err = canvas.begin(size(70_000, 100), Rgb8::WHITE).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn drawing_before_begin_fails() {
    let mut canvas = CpuCanvas::new();
    let rect = RectPx {
        x: 0,
        y: 0,
        width: 1,
        height: 1,
    };
    assert!(canvas.fill_rect(rect, Rgb8::RED).is_err());
    assert!(canvas.finish().is_err());
}

#[test]
fn missing_font_is_a_resource_error() {
    let mut canvas = CpuCanvas::new();
    let err = canvas
        .load_font(Path::new("definitely/not/here.ttf"), 24.0)
        .unwrap_err();
    assert!(matches!(err, TorsoError::Resource(_)), "{err}");
}

#[test]
fn garbage_font_is_a_resource_error() {
    let dir = PathBuf::from("target").join("cpu_canvas_tests");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("garbage.ttf");
    std::fs::write(&path, b"not a font").unwrap();

    let mut canvas = CpuCanvas::new();
    let err = canvas.load_font(&path, 24.0).unwrap_err();
    assert!(matches!(err, TorsoError::Resource(_)), "{err}");
}

#[test]
fn rects_paint_in_order_over_background() {
    let mut canvas = CpuCanvas::new();
    canvas.begin(size(20, 20), Rgb8::WHITE).unwrap();
    canvas
        .fill_rect(
            RectPx {
                x: 0,
                y: 0,
                width: 10,
                height: 10,
            },
            Rgb8::BLUE,
        )
        .unwrap();
    canvas
        .fill_rect(
            RectPx {
                x: 5,
                y: 5,
                width: 10,
                height: 10,
            },
            Rgb8::RED,
        )
        .unwrap();
    let img = canvas.finish().unwrap();

    assert_eq!((img.width, img.height), (20, 20));
    assert_eq!(img.pixel(2, 2), Some(Rgb8::BLUE));
    assert_eq!(img.pixel(7, 7), Some(Rgb8::RED));
    assert_eq!(img.pixel(12, 12), Some(Rgb8::RED));
    assert_eq!(img.pixel(18, 18), Some(Rgb8::WHITE));
}

#[test]
fn text_measures_and_draws_with_system_font() {
    let Some(font) = system_font() else {
        eprintln!("skipping: no system TrueType font found");
        return;
    };

    let mut canvas = CpuCanvas::new();
    canvas.load_font(&font, 24.0).unwrap();
    assert!(canvas.font_family().is_some());

    let short = canvas.measure_text("aqua").unwrap();
    let long = canvas.measure_text("aqua.flv - slide 0001").unwrap();
    assert!(short.width > 0.0 && short.height > 0.0);
    assert!(long.width > short.width);
    assert!((long.height - short.height).abs() < 1e-6);

    canvas.begin(size(200, 100), Rgb8::WHITE).unwrap();
    canvas
        .draw_text("aqua.flv", PointPx::new(10.0, 10.0), Rgb8::BLACK)
        .unwrap();
    let img = canvas.finish().unwrap();
    let dark = img
        .data
        .chunks_exact(3)
        .filter(|px| px[0] < 128 && px[1] < 128 && px[2] < 128)
        .count();
    assert!(dark > 0, "caption left no dark pixels");
}
