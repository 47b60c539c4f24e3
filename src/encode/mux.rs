use std::path::Path;

use crate::audio::pcm::{TempFileGuard, temp_f32le_path, write_f32le_file};
use crate::encode::sink::{AudioInputConfig, EncodeConfig, VideoEncoder};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{TorsoError, TorsoResult};
use crate::foundation::math::round_to_u64;
use crate::timeline::assemble::Timeline;

/// Output frames each slide is held for.
///
/// Slide boundaries are rounded on the running total, `round(end * fps) - round(start * fps)`,
/// so the frame total is `round(total * fps)` and never drifts from the audio. A slide shorter
/// than a frame may get none; a video that would round to zero frames shows its first slide once.
pub fn slide_frame_counts(durations_secs: &[f64], fps: Fps) -> Vec<u64> {
    let rate = fps.as_f64();
    let mut counts = Vec::with_capacity(durations_secs.len());
    let mut end_secs = 0.0f64;
    let mut prev_frame = 0u64;
    for &d in durations_secs {
        end_secs += d;
        let end_frame = round_to_u64(end_secs * rate).max(prev_frame);
        counts.push(end_frame - prev_frame);
        prev_frame = end_frame;
    }
    if prev_frame == 0
        && let Some(first) = counts.first_mut()
    {
        *first = 1;
    }
    counts
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EncodeStats {
    pub frames_written: u64,
    /// Stereo frames handed to the encoder as audio input.
    pub audio_frames: u64,
}

/// Write `timeline` to `out_path` through `encoder`, re-timed to `fps`.
///
/// The audio track goes through a temporary `f32le` file that is removed when this returns.
#[tracing::instrument(level = "info", skip(timeline, encoder), fields(slides = timeline.slides.len(), out = %out_path.display()))]
pub fn encode_timeline(
    timeline: &Timeline,
    fps: Fps,
    out_path: &Path,
    encoder: &mut dyn VideoEncoder,
) -> TorsoResult<EncodeStats> {
    let size = timeline
        .canvas()
        .ok_or_else(|| TorsoError::validation("cannot encode an empty timeline"))?;

    let audio_path = temp_f32le_path("mux");
    let guard = TempFileGuard(Some(audio_path.clone()));
    write_f32le_file(&timeline.audio.interleaved, &audio_path)?;

    encoder.begin(EncodeConfig {
        width: size.width,
        height: size.height,
        fps,
        out_path: out_path.to_path_buf(),
        overwrite: true,
        audio: Some(AudioInputConfig {
            path: audio_path,
            sample_rate: timeline.audio.sample_rate,
            channels: timeline.audio.channels,
        }),
    })?;

    let durations: Vec<f64> = timeline.slides.iter().map(|s| s.duration_secs).collect();
    let counts = slide_frame_counts(&durations, fps);

    let mut next = 0u64;
    for (slide, frames) in timeline.slides.iter().zip(counts) {
        for _ in 0..frames {
            encoder.push_frame(FrameIndex(next), &slide.image)?;
            next += 1;
        }
    }
    encoder.end()?;
    drop(guard);

    let stats = EncodeStats {
        frames_written: next,
        audio_frames: timeline.audio.len_frames() as u64,
    };
    tracing::info!(
        frames = stats.frames_written,
        audio_frames = stats.audio_frames,
        "encoded timeline"
    );
    Ok(stats)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/mux.rs"]
mod tests;
