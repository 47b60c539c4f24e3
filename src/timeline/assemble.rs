use crate::audio::tone::{TONE_CHANNELS, ToneBuffer};
use crate::foundation::core::CanvasSize;
use crate::foundation::error::{TorsoError, TorsoResult};
use crate::render::backend::SlideImage;

/// One still on the visual track, held for `duration_secs`.
#[derive(Clone, Debug)]
pub struct TimelineSlide {
    pub image: SlideImage,
    pub duration_secs: f64,
}

/// Continuous interleaved audio for the whole video.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioTrack {
    pub sample_rate: u32,
    pub channels: u16,
    pub interleaved: Vec<f32>,
}

impl AudioTrack {
    pub fn len_frames(&self) -> usize {
        self.interleaved.len() / usize::from(self.channels)
    }

    pub fn duration_secs(&self) -> f64 {
        self.len_frames() as f64 / f64::from(self.sample_rate)
    }
}

/// Gapless visual track plus the audio stream that plays under it.
#[derive(Clone, Debug)]
pub struct Timeline {
    pub slides: Vec<TimelineSlide>,
    pub audio: AudioTrack,
}

impl Timeline {
    /// Sum of per-slide durations.
    pub fn visual_duration_secs(&self) -> f64 {
        self.slides.iter().map(|s| s.duration_secs).sum()
    }

    pub fn audio_duration_secs(&self) -> f64 {
        self.audio.duration_secs()
    }

    /// Shared size of every slide.
    pub fn canvas(&self) -> Option<CanvasSize> {
        self.slides.first().map(|s| s.image.size())
    }
}

/// Concatenate slides (in order, each for its duration) and tones (in order, abutting at sample
/// boundaries) into one [`Timeline`].
///
/// The audio may differ from the visual duration by at most the per-tone sample rounding
/// (half a sample per slide); anything larger is rejected.
#[tracing::instrument(level = "debug", skip_all, fields(slides = slides.len(), tones = tones.len()))]
pub fn assemble(slides: Vec<(SlideImage, f64)>, tones: Vec<ToneBuffer>) -> TorsoResult<Timeline> {
    if slides.is_empty() || tones.is_empty() {
        return Err(TorsoError::validation(
            "cannot assemble an empty timeline (need at least one slide and one tone)",
        ));
    }
    if slides.len() != tones.len() {
        return Err(TorsoError::validation(format!(
            "slide/tone count mismatch: {} slides, {} tones",
            slides.len(),
            tones.len()
        )));
    }

    let size = slides[0].0.size();
    for (i, (image, duration)) in slides.iter().enumerate() {
        if image.size() != size {
            return Err(TorsoError::validation(format!(
                "slide {} is {}x{}, expected {}x{}",
                i + 1,
                image.width,
                image.height,
                size.width,
                size.height
            )));
        }
        if !duration.is_finite() || *duration <= 0.0 {
            return Err(TorsoError::validation(format!(
                "slide {} duration must be finite and > 0, got {duration}",
                i + 1
            )));
        }
    }

    let sample_rate = tones[0].sample_rate;
    if sample_rate == 0 {
        return Err(TorsoError::validation("tone sample_rate must be > 0"));
    }
    if let Some((i, t)) = tones
        .iter()
        .enumerate()
        .find(|(_, t)| t.sample_rate != sample_rate)
    {
        return Err(TorsoError::validation(format!(
            "tone {} has sample rate {} Hz, expected {sample_rate} Hz",
            i + 1,
            t.sample_rate
        )));
    }

    let total_samples: usize = tones.iter().map(|t| t.interleaved.len()).sum();
    let mut interleaved = Vec::with_capacity(total_samples);
    for tone in tones {
        interleaved.extend_from_slice(&tone.interleaved);
    }

    let timeline = Timeline {
        slides: slides
            .into_iter()
            .map(|(image, duration_secs)| TimelineSlide {
                image,
                duration_secs,
            })
            .collect(),
        audio: AudioTrack {
            sample_rate,
            channels: TONE_CHANNELS,
            interleaved,
        },
    };

    let visual = timeline.visual_duration_secs();
    let audio = timeline.audio_duration_secs();
    let tolerance = timeline.slides.len() as f64 * 0.5 / f64::from(sample_rate) + 1e-9;
    if (visual - audio).abs() > tolerance {
        return Err(TorsoError::validation(format!(
            "audio track lasts {audio:.6}s but slides last {visual:.6}s"
        )));
    }

    tracing::debug!(
        visual_secs = visual,
        audio_frames = timeline.audio.len_frames(),
        "assembled timeline"
    );
    Ok(timeline)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/assemble.rs"]
mod tests;
