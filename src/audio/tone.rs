use crate::foundation::error::TorsoResult;
use crate::foundation::random::RandomSource;
use crate::model::{TONE_AMPLITUDE, ToneSpec};

/// Stereo channel count of every tone.
pub const TONE_CHANNELS: u16 = 2;

/// A synthesized stereo sine tone; both channels carry identical samples.
#[derive(Clone, Debug, PartialEq)]
pub struct ToneBuffer {
    pub sample_rate: u32,
    /// Frequency the tone was generated at.
    pub frequency_hz: f64,
    /// Interleaved `[l0, r0, l1, r1, ...]`.
    pub interleaved: Vec<f32>,
}

impl ToneBuffer {
    pub fn len_frames(&self) -> usize {
        self.interleaved.len() / usize::from(TONE_CHANNELS)
    }

    pub fn is_empty(&self) -> bool {
        self.interleaved.is_empty()
    }

    /// `(left, right)` at frame `i`.
    pub fn frame(&self, i: usize) -> Option<(f32, f32)> {
        let base = i.checked_mul(usize::from(TONE_CHANNELS))?;
        let l = *self.interleaved.get(base)?;
        let r = *self.interleaved.get(base + 1)?;
        Some((l, r))
    }

    pub fn duration_secs(&self) -> f64 {
        self.len_frames() as f64 / f64::from(self.sample_rate)
    }
}

/// `0.5 * sin(2π f k / sample_rate)` for `k` in `0..n`.
pub fn sine_samples(frequency_hz: f64, sample_rate: u32, n: usize) -> impl Iterator<Item = f32> {
    let step = std::f64::consts::TAU * frequency_hz / f64::from(sample_rate);
    (0..n).map(move |k| (TONE_AMPLITUDE * (step * k as f64).sin()) as f32)
}

/// Draw a frequency uniformly from `[min_freq_hz, max_freq_hz]` and synthesize
/// `round(sample_rate * duration_secs)` stereo frames of it.
#[tracing::instrument(level = "debug", skip(rng))]
pub fn synthesize(spec: &ToneSpec, rng: &mut dyn RandomSource) -> TorsoResult<ToneBuffer> {
    spec.validate()?;

    let frequency_hz = rng.float_inclusive(spec.min_freq_hz, spec.max_freq_hz)?;
    let n = spec.frame_count() as usize;

    let mut interleaved = Vec::with_capacity(n * usize::from(TONE_CHANNELS));
    for s in sine_samples(frequency_hz, spec.sample_rate, n) {
        interleaved.push(s);
        interleaved.push(s);
    }

    tracing::debug!(frequency_hz, frames = n, "synthesized tone");
    Ok(ToneBuffer {
        sample_rate: spec.sample_rate,
        frequency_hz,
        interleaved,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/audio/tone.rs"]
mod tests;
