use super::*;
use crate::encode::sink::InMemoryEncoder;
use crate::foundation::core::{CanvasSize, Rgb8};
use crate::render::backend::SlideImage;
use crate::timeline::assemble::{AudioTrack, TimelineSlide};

fn fps(n: u32) -> Fps {
    Fps { num: n, den: 1 }
}

fn slide(color: Rgb8, duration_secs: f64) -> TimelineSlide {
    TimelineSlide {
        image: SlideImage::filled(
            CanvasSize {
                width: 4,
                height: 2,
            },
            color,
        ),
        duration_secs,
    }
}

fn timeline(slides: Vec<TimelineSlide>, audio_frames: usize) -> Timeline {
    Timeline {
        slides,
        audio: AudioTrack {
            sample_rate: 1_000,
            channels: 2,
            interleaved: (0..audio_frames * 2).map(|i| i as f32 * 0.001).collect(),
        },
    }
}

#[test]
fn frame_counts_round_on_running_boundaries() {
    assert_eq!(slide_frame_counts(&[1.0], fps(25)), vec![25]);
    assert_eq!(slide_frame_counts(&[0.5, 0.5, 0.5], fps(25)), vec![13, 12, 13]);
    assert_eq!(
        slide_frame_counts(&[1.0, 1.0], Fps { num: 30000, den: 1001 }),
        vec![30, 30]
    );
    assert!(slide_frame_counts(&[], fps(25)).is_empty());
}

#[test]
fn frame_total_tracks_total_duration() {
    for d in [0.5, 0.3, 0.04] {
        let n = 10;
        let counts = slide_frame_counts(&vec![d; n], fps(25));
        let total: u64 = counts.iter().sum();
        assert_eq!(total, (n as f64 * d * 25.0).round() as u64, "d = {d}");
    }
}

#[test]
fn sub_frame_video_still_shows_first_slide() {
    assert_eq!(slide_frame_counts(&[0.01, 0.005], fps(25)), vec![1, 0]);
    assert_eq!(slide_frame_counts(&[0.01], fps(25)), vec![1]);
}

#[test]
fn encoded_video_length_matches_audio_length() {
    for d in [0.5, 0.3] {
        let n = 10;
        let audio_frames = (n as f64 * d * 1_000.0).round() as usize;
        let slides = (0..n)
            .map(|i| slide(if i % 2 == 0 { Rgb8::BLUE } else { Rgb8::RED }, d))
            .collect();
        let tl = timeline(slides, audio_frames);

        let mut enc = InMemoryEncoder::new();
        let stats = encode_timeline(&tl, fps(25), Path::new("target/len.mp4"), &mut enc).unwrap();

        let expected = (n as f64 * d * 25.0).round() as u64;
        assert_eq!(stats.frames_written, expected, "d = {d}");
        assert_eq!(enc.frame_count(), expected);
        let video_secs = fps(25).as_f64().recip() * stats.frames_written as f64;
        assert!((video_secs - tl.audio.duration_secs()).abs() < 0.5 / 25.0);
    }
}

#[test]
fn slides_are_held_in_order_for_their_frame_counts() {
    let tl = timeline(
        vec![slide(Rgb8::BLUE, 0.2), slide(Rgb8::RED, 0.4)],
        600,
    );
    let mut enc = InMemoryEncoder::new();
    let stats = encode_timeline(&tl, fps(10), Path::new("target/mux.mp4"), &mut enc).unwrap();

    assert_eq!(stats.frames_written, 6);
    assert_eq!(stats.audio_frames, 600);
    assert!(enc.ended());

    let runs = enc.runs();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].first, FrameIndex(0));
    assert_eq!(runs[0].count, 2);
    assert_eq!(runs[0].image.pixel(0, 0), Some(Rgb8::BLUE));
    assert_eq!(runs[1].first, FrameIndex(2));
    assert_eq!(runs[1].count, 4);
    assert_eq!(runs[1].image.pixel(0, 0), Some(Rgb8::RED));
}

#[test]
fn config_carries_canvas_fps_and_audio_format() {
    let tl = timeline(vec![slide(Rgb8::WHITE, 1.0)], 1_000);
    let mut enc = InMemoryEncoder::new();
    encode_timeline(&tl, fps(25), Path::new("target/cfg.mp4"), &mut enc).unwrap();

    let cfg = enc.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (4, 2));
    assert_eq!(cfg.fps, fps(25));
    assert!(cfg.overwrite);
    let audio = cfg.audio.as_ref().unwrap();
    assert_eq!(audio.sample_rate, 1_000);
    assert_eq!(audio.channels, 2);

    assert_eq!(enc.audio(), tl.audio.interleaved.as_slice());
    assert!(!audio.path.exists(), "temp audio should be removed");
}

struct FailingEncoder {
    audio_path: Option<std::path::PathBuf>,
}

impl VideoEncoder for FailingEncoder {
    fn begin(&mut self, cfg: EncodeConfig) -> TorsoResult<()> {
        self.audio_path = cfg.audio.map(|a| a.path);
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, _frame: &SlideImage) -> TorsoResult<()> {
        Err(TorsoError::encoding("rejected"))
    }

    fn end(&mut self) -> TorsoResult<()> {
        Ok(())
    }
}

#[test]
fn encoder_failure_propagates_and_cleans_temp_audio() {
    let tl = timeline(vec![slide(Rgb8::WHITE, 0.1)], 100);
    let mut enc = FailingEncoder { audio_path: None };
    let err = encode_timeline(&tl, fps(10), Path::new("target/fail.mp4"), &mut enc).unwrap_err();
    assert!(matches!(err, TorsoError::Encoding(_)));

    let path = enc.audio_path.unwrap();
    assert!(!path.exists());
}

#[test]
fn empty_timeline_is_rejected() {
    let tl = timeline(Vec::new(), 0);
    let mut enc = InMemoryEncoder::new();
    let err = encode_timeline(&tl, fps(10), Path::new("target/empty.mp4"), &mut enc).unwrap_err();
    assert!(err.is_validation());
    assert!(enc.config().is_none());
}
