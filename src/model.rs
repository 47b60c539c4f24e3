//! Generation parameters: the global [`VideoSpec`] and the per-slide/per-tone specs derived from it.

use std::path::PathBuf;

use crate::foundation::core::{CanvasSize, Fps};
use crate::foundation::error::{TorsoError, TorsoResult};
use crate::foundation::math::round_to_u64;

/// Sample rate of every synthesized tone and of the muxed AAC stream.
pub const TONE_SAMPLE_RATE: u32 = 96_000;
/// Peak amplitude of the synthesized sine, relative to a [-1, 1] full scale.
pub const TONE_AMPLITUDE: f64 = 0.5;
/// Smallest side length a random rectangle may have.
pub const MIN_RECT_SIDE: u32 = 50;
/// Caption distance from the left and bottom canvas edges.
pub const CAPTION_MARGIN_PX: u32 = 10;
/// Largest sample count a single tone may have: one hour at [`TONE_SAMPLE_RATE`].
pub const MAX_TONE_FRAMES: u64 = 3_600 * TONE_SAMPLE_RATE as u64;

/// Global parameters of one generation run.
///
/// Deserializes with `#[serde(default)]`, so partial JSON documents fall back to the CLI defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VideoSpec {
    pub width: u32,
    pub height: u32,
    pub num_slides: u32,
    /// Seconds each slide stays on screen.
    pub slide_duration: f64,
    /// TrueType/OpenType font used for captions.
    pub font: PathBuf,
    pub font_size: u32,
    /// Text shown before ` - slide NNNN` in every caption.
    pub displayed_file_name: String,
    pub min_freq: f64,
    pub max_freq: f64,
    /// Output MP4 path.
    pub file_name: PathBuf,
    pub fps: u32,
}

impl Default for VideoSpec {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            num_slides: 10,
            slide_duration: 1.0,
            font: PathBuf::from("arial.ttf"),
            font_size: 24,
            displayed_file_name: "aqua.flv".to_string(),
            min_freq: 400.0,
            max_freq: 1000.0,
            file_name: PathBuf::from("torso_output.mp4"),
            fps: 25,
        }
    }
}

impl VideoSpec {
    /// Reject every invalid configuration up front, before any slide is rendered.
    pub fn validate(&self) -> TorsoResult<()> {
        if self.num_slides == 0 {
            return Err(TorsoError::validation(
                "num_slides must be >= 1 (an empty slideshow has nothing to encode)",
            ));
        }
        if self.fps == 0 {
            return Err(TorsoError::validation("fps must be > 0"));
        }
        if self.file_name.as_os_str().is_empty() {
            return Err(TorsoError::validation("output file_name must be non-empty"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(TorsoError::validation(format!(
                "width/height must be even (required for yuv420p mp4 output), got {}x{}",
                self.width, self.height
            )));
        }
        if self.max_freq > f64::from(TONE_SAMPLE_RATE) / 2.0 {
            tracing::warn!(
                max_freq = self.max_freq,
                sample_rate = TONE_SAMPLE_RATE,
                "max_freq exceeds the Nyquist limit; tones may alias"
            );
        }
        self.slide_spec(1).validate()?;
        self.tone_spec().validate()
    }

    pub fn canvas(&self) -> CanvasSize {
        CanvasSize {
            width: self.width,
            height: self.height,
        }
    }

    pub fn output_fps(&self) -> TorsoResult<Fps> {
        Fps::from_int(self.fps)
    }

    /// Spec for the slide at 1-based `index`.
    pub fn slide_spec(&self, index: u32) -> SlideSpec {
        SlideSpec {
            index,
            width: self.width,
            height: self.height,
            font_path: self.font.clone(),
            font_size: self.font_size,
            displayed_file_name: self.displayed_file_name.clone(),
        }
    }

    /// Tone spec shared by every slide of the run.
    pub fn tone_spec(&self) -> ToneSpec {
        ToneSpec {
            duration_secs: self.slide_duration,
            sample_rate: TONE_SAMPLE_RATE,
            min_freq_hz: self.min_freq,
            max_freq_hz: self.max_freq,
        }
    }

    pub fn from_json_str(json: &str) -> TorsoResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| TorsoError::validation(format!("invalid video spec JSON: {e}")))
    }

    pub fn to_json_pretty(&self) -> TorsoResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TorsoError::validation(format!("video spec is not serializable: {e}")))
    }
}

/// Everything the slide renderer needs for one slide.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SlideSpec {
    /// 1-based position in the slideshow.
    pub index: u32,
    pub width: u32,
    pub height: u32,
    pub font_path: PathBuf,
    pub font_size: u32,
    pub displayed_file_name: String,
}

impl SlideSpec {
    pub fn validate(&self) -> TorsoResult<()> {
        if self.index == 0 {
            return Err(TorsoError::validation("slide index is 1-based, got 0"));
        }
        if self.width == 0 || self.height == 0 {
            return Err(TorsoError::validation(format!(
                "slide width/height must be > 0, got {}x{}",
                self.width, self.height
            )));
        }
        let min_side = MIN_RECT_SIDE * 2;
        if self.width < min_side || self.height < min_side {
            return Err(TorsoError::validation(format!(
                "slide must be at least {min_side}x{min_side} so rectangle sides can range over \
                 [{MIN_RECT_SIDE}, side/2], got {}x{}",
                self.width, self.height
            )));
        }
        if self.font_size == 0 {
            return Err(TorsoError::validation("font_size must be > 0"));
        }
        if self.font_path.as_os_str().is_empty() {
            return Err(TorsoError::validation("font path must be non-empty"));
        }
        Ok(())
    }

    pub fn canvas(&self) -> CanvasSize {
        CanvasSize {
            width: self.width,
            height: self.height,
        }
    }

    /// `"<displayed_file_name> - slide <index:04>"`.
    pub fn caption(&self) -> String {
        format!("{} - slide {:04}", self.displayed_file_name, self.index)
    }
}

/// Parameters of one synthesized tone.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToneSpec {
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub min_freq_hz: f64,
    pub max_freq_hz: f64,
}

impl ToneSpec {
    pub fn validate(&self) -> TorsoResult<()> {
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(TorsoError::validation(format!(
                "tone duration must be finite and > 0, got {}",
                self.duration_secs
            )));
        }
        if self.sample_rate == 0 {
            return Err(TorsoError::validation("tone sample_rate must be > 0"));
        }
        if !self.min_freq_hz.is_finite() || !self.max_freq_hz.is_finite() {
            return Err(TorsoError::validation("tone frequencies must be finite"));
        }
        if self.min_freq_hz < 0.0 {
            return Err(TorsoError::validation(format!(
                "min_freq must be >= 0, got {}",
                self.min_freq_hz
            )));
        }
        if self.min_freq_hz > self.max_freq_hz {
            return Err(TorsoError::validation(format!(
                "min_freq ({}) must be <= max_freq ({})",
                self.min_freq_hz, self.max_freq_hz
            )));
        }
        let frames = self.frame_count();
        if frames == 0 {
            return Err(TorsoError::validation(format!(
                "tone of {}s at {} Hz has no samples",
                self.duration_secs, self.sample_rate
            )));
        }
        if frames > MAX_TONE_FRAMES {
            return Err(TorsoError::validation(format!(
                "tone of {}s at {} Hz exceeds the limit of {MAX_TONE_FRAMES} samples",
                self.duration_secs, self.sample_rate
            )));
        }
        Ok(())
    }

    /// `round(sample_rate * duration_secs)`.
    pub fn frame_count(&self) -> u64 {
        round_to_u64(f64::from(self.sample_rate) * self.duration_secs)
    }
}
