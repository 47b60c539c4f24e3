use std::path::{Path, PathBuf};

use crate::audio::tone::synthesize;
use crate::encode::ffmpeg::{FfmpegEncoder, is_ffmpeg_on_path};
use crate::encode::mux::{EncodeStats, encode_timeline};
use crate::encode::sink::VideoEncoder;
use crate::foundation::error::{TorsoError, TorsoResult};
use crate::foundation::random::{RandomSource, StdRandom};
use crate::model::VideoSpec;
use crate::render::backend::Canvas;
use crate::render::cpu::CpuCanvas;
use crate::render::slide::render_slide;
use crate::timeline::assemble::assemble;

/// Run controls for [`generate_video`] that are not generation parameters.
#[derive(Clone, Debug, Default)]
pub struct GenerateOpts {
    /// Also write every rendered slide as `slide_NNNN.png` here.
    pub frames_dir: Option<PathBuf>,
}

/// What a successful run produced.
#[derive(Clone, Debug)]
pub struct GenerateReport {
    pub output: PathBuf,
    pub slides: u32,
    /// Sampled tone frequency per slide, in slide order.
    pub frequencies: Vec<f64>,
    pub stats: EncodeStats,
}

/// Generate the whole slideshow described by `spec` and hand it to `encoder`.
///
/// Validation happens before anything is rendered. Slides and tones are produced strictly in
/// index order `1..=num_slides`, one pair at a time.
#[tracing::instrument(level = "info", skip_all, fields(slides = spec.num_slides, out = %spec.file_name.display()))]
pub fn generate_video(
    spec: &VideoSpec,
    opts: &GenerateOpts,
    canvas: &mut dyn Canvas,
    rng: &mut dyn RandomSource,
    encoder: &mut dyn VideoEncoder,
) -> TorsoResult<GenerateReport> {
    spec.validate()?;
    let fps = spec.output_fps()?;
    let tone_spec = spec.tone_spec();

    if let Some(dir) = &opts.frames_dir {
        std::fs::create_dir_all(dir).map_err(|e| {
            TorsoError::resource(format!(
                "failed to create frames directory '{}': {e}",
                dir.display()
            ))
        })?;
    }

    let n = spec.num_slides as usize;
    let mut slides = Vec::with_capacity(n);
    let mut tones = Vec::with_capacity(n);
    let mut frequencies = Vec::with_capacity(n);

    for index in 1..=spec.num_slides {
        let rendered = render_slide(&spec.slide_spec(index), canvas, rng)?;
        let tone = synthesize(&tone_spec, rng)?;
        tracing::debug!(
            index,
            blue = ?rendered.rects[0],
            red = ?rendered.rects[1],
            frequency_hz = tone.frequency_hz,
            "generated slide"
        );

        if let Some(dir) = &opts.frames_dir {
            rendered
                .image
                .save_png(&frame_png_path(dir, index))?;
        }

        frequencies.push(tone.frequency_hz);
        slides.push((rendered.image, spec.slide_duration));
        tones.push(tone);
    }

    let timeline = assemble(slides, tones)?;
    tracing::info!(
        visual_secs = timeline.visual_duration_secs(),
        audio_frames = timeline.audio.len_frames(),
        "assembled timeline"
    );

    let stats = encode_timeline(&timeline, fps, &spec.file_name, encoder)?;
    Ok(GenerateReport {
        output: spec.file_name.clone(),
        slides: spec.num_slides,
        frequencies,
        stats,
    })
}

/// Generate `spec` into an MP4 with the CPU rasterizer and the system `ffmpeg`.
///
/// `ffmpeg` must be installed and on `PATH`; this is checked before any slide is rendered.
/// `seed` makes the run reproducible; `None` seeds from entropy.
pub fn generate_video_to_file(
    spec: &VideoSpec,
    seed: Option<u64>,
    opts: &GenerateOpts,
) -> TorsoResult<GenerateReport> {
    spec.validate()?;
    if !is_ffmpeg_on_path() {
        return Err(TorsoError::resource(
            "ffmpeg is required for MP4 encoding, but was not found on PATH",
        ));
    }

    let mut rng = match seed {
        Some(seed) => StdRandom::seeded(seed),
        None => StdRandom::from_entropy(),
    };
    let mut canvas = CpuCanvas::new();
    let mut encoder = FfmpegEncoder::new();
    generate_video(spec, opts, &mut canvas, &mut rng, &mut encoder)
}

/// `<dir>/slide_NNNN.png` for 1-based `index`.
pub fn frame_png_path(dir: &Path, index: u32) -> PathBuf {
    dir.join(format!("slide_{index:04}.png"))
}
