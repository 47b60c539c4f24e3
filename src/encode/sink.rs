use std::path::PathBuf;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{TorsoError, TorsoResult};
use crate::render::backend::SlideImage;

/// Output parameters handed to a [`VideoEncoder`] before the first frame.
#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    pub out_path: PathBuf,
    /// Overwrite `out_path` if it already exists.
    pub overwrite: bool,
    /// Raw PCM audio to mux under the frames.
    pub audio: Option<AudioInputConfig>,
}

impl EncodeConfig {
    pub fn validate(&self) -> TorsoResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TorsoError::validation(
                "encode width/height must be non-zero",
            ));
        }
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(TorsoError::validation("encode fps must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            // yuv420p subsamples chroma 2x2.
            return Err(TorsoError::validation(
                "encode width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if let Some(audio) = &self.audio {
            if audio.sample_rate == 0 {
                return Err(TorsoError::validation(
                    "audio sample_rate must be non-zero when audio is enabled",
                ));
            }
            if audio.channels == 0 {
                return Err(TorsoError::validation(
                    "audio channels must be non-zero when audio is enabled",
                ));
            }
        }
        Ok(())
    }
}

/// Raw PCM audio input for encoders that mux audio.
#[derive(Clone, Debug)]
pub struct AudioInputConfig {
    /// Path to interleaved `f32le` PCM data.
    pub path: PathBuf,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Consumes frames in timeline order and writes one output.
///
/// `push_frame` is called with strictly increasing [`FrameIndex`] values between `begin` and
/// `end`.
pub trait VideoEncoder {
    fn begin(&mut self, cfg: EncodeConfig) -> TorsoResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &SlideImage) -> TorsoResult<()>;
    fn end(&mut self) -> TorsoResult<()>;
}

/// Consecutive identical frames captured by [`InMemoryEncoder`].
#[derive(Clone, Debug)]
pub struct FrameRun {
    pub first: FrameIndex,
    pub count: u64,
    pub image: SlideImage,
}

/// In-memory encoder for tests and debugging.
///
/// Identical consecutive frames are collapsed into [`FrameRun`]s; the audio file named in the
/// config is read back at `begin` so it survives temp-file cleanup.
#[derive(Debug, Default)]
pub struct InMemoryEncoder {
    cfg: Option<EncodeConfig>,
    runs: Vec<FrameRun>,
    audio: Vec<f32>,
    ended: bool,
}

impl InMemoryEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<&EncodeConfig> {
        self.cfg.as_ref()
    }

    pub fn runs(&self) -> &[FrameRun] {
        &self.runs
    }

    pub fn frame_count(&self) -> u64 {
        self.runs.iter().map(|r| r.count).sum()
    }

    /// Interleaved samples read from the audio input.
    pub fn audio(&self) -> &[f32] {
        &self.audio
    }

    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl VideoEncoder for InMemoryEncoder {
    fn begin(&mut self, cfg: EncodeConfig) -> TorsoResult<()> {
        cfg.validate()?;
        self.audio = match &cfg.audio {
            Some(a) => {
                let bytes = std::fs::read(&a.path).map_err(|e| {
                    TorsoError::resource(format!(
                        "failed to read audio input '{}': {e}",
                        a.path.display()
                    ))
                })?;
                bytes
                    .chunks_exact(4)
                    .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                    .collect()
            }
            None => Vec::new(),
        };
        self.cfg = Some(cfg);
        self.runs.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &SlideImage) -> TorsoResult<()> {
        if self.cfg.is_none() {
            return Err(TorsoError::encoding("in-memory encoder not started"));
        }
        if let Some(last) = self.runs.last_mut() {
            if idx.0 != last.first.0 + last.count {
                return Err(TorsoError::encoding(format!(
                    "out-of-order frame index {} (expected {})",
                    idx.0,
                    last.first.0 + last.count
                )));
            }
            if last.image == *frame {
                last.count += 1;
                return Ok(());
            }
        }
        self.runs.push(FrameRun {
            first: idx,
            count: 1,
            image: frame.clone(),
        });
        Ok(())
    }

    fn end(&mut self) -> TorsoResult<()> {
        if self.cfg.is_none() {
            return Err(TorsoError::encoding("in-memory encoder not started"));
        }
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
