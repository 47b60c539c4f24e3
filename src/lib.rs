//! Torso procedurally generates short slideshow videos.
//!
//! Every slide is a white canvas with two randomly placed rectangles (blue, then red on top) and a
//! caption in the bottom-left corner. Each slide is paired with a stereo sine tone of random
//! frequency, and the result is muxed into one MP4.
//!
//! # Pipeline overview
//!
//! 1. **Validate**: [`VideoSpec::validate`] rejects bad configurations before any work starts
//! 2. **Render**: [`render_slide`] draws slide `1..=N` through a [`Canvas`]
//! 3. **Synthesize**: [`synthesize`] produces the matching [`ToneBuffer`]
//! 4. **Assemble**: [`assemble`] concatenates slides and tones into a gapless [`Timeline`]
//! 5. **Encode**: [`encode_timeline`] re-times the slides to whole output frames and streams them
//!    to a [`VideoEncoder`] (the system `ffmpeg` binary for MP4 output)
//!
//! Randomness, rasterization and encoding sit behind [`RandomSource`], [`Canvas`] and
//! [`VideoEncoder`], so [`generate_video`] runs unchanged against [`RecordingCanvas`] and
//! [`InMemoryEncoder`] in tests.
#![forbid(unsafe_code)]

mod audio;
mod encode;
mod foundation;
mod model;
mod pipeline;
mod render;
mod timeline;

pub use audio::pcm::{TempFileGuard, temp_f32le_path, write_f32le_file};
pub use audio::tone::{TONE_CHANNELS, ToneBuffer, sine_samples, synthesize};
pub use encode::ffmpeg::{FfmpegEncoder, ensure_parent_dir, ensure_writable, is_ffmpeg_on_path};
pub use encode::mux::{EncodeStats, encode_timeline, slide_frame_counts};
pub use encode::sink::{AudioInputConfig, EncodeConfig, FrameRun, InMemoryEncoder, VideoEncoder};
pub use foundation::core::{CanvasSize, Fps, FrameIndex, PointPx, RectPx, Rgb8};
pub use foundation::error::{TorsoError, TorsoResult};
pub use foundation::random::{RandomSource, StdRandom};
pub use model::{
    CAPTION_MARGIN_PX, MAX_TONE_FRAMES, MIN_RECT_SIDE, SlideSpec, TONE_AMPLITUDE,
    TONE_SAMPLE_RATE, ToneSpec, VideoSpec,
};
pub use pipeline::{
    GenerateOpts, GenerateReport, frame_png_path, generate_video, generate_video_to_file,
};
pub use render::backend::{Canvas, SlideImage, TextExtent, TextMeasurer};
pub use render::cpu::CpuCanvas;
pub use render::recording::{CanvasCall, RecordingCanvas};
pub use render::slide::{
    BACKGROUND, CAPTION_COLOR, FIRST_RECT_COLOR, RenderedSlide, SECOND_RECT_COLOR, caption_origin,
    random_rect, render_slide,
};
pub use render::text::{TextBrushRgba8, TextLayoutEngine, layout_extent};
pub use timeline::assemble::{AudioTrack, Timeline, TimelineSlide, assemble};
