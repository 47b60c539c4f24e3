use std::io::Read;
use std::path::Path;
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};

use crate::encode::sink::{EncodeConfig, VideoEncoder};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{TorsoError, TorsoResult};
use crate::render::backend::SlideImage;

/// Encoder that spawns the system `ffmpeg` and streams raw rgb24 frames to its stdin.
///
/// Output is H.264 (`libx264`, yuv420p) plus AAC audio when the config carries an audio input.
#[derive(Default)]
pub struct FfmpegEncoder {
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<EncodeConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegEncoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VideoEncoder for FfmpegEncoder {
    #[tracing::instrument(level = "debug", skip_all, fields(out = %cfg.out_path.display()))]
    fn begin(&mut self, cfg: EncodeConfig) -> TorsoResult<()> {
        cfg.validate()?;
        // Checked before any filesystem side effect.
        if !is_ffmpeg_on_path() {
            return Err(TorsoError::resource(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        ensure_parent_dir(&cfg.out_path)?;
        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(TorsoError::validation(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }
        ensure_writable(&cfg.out_path)?;

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        // The existence check above already honoured `overwrite`; the writability probe may have
        // left an empty file behind, so ffmpeg always overwrites.
        cmd.args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
        ]);
        push_input_fps(&mut cmd, cfg.fps);
        cmd.args(["-i", "pipe:0"]);

        if let Some(audio) = cfg.audio.as_ref() {
            cmd.args([
                "-f",
                "f32le",
                "-ar",
                &audio.sample_rate.to_string(),
                "-ac",
                &audio.channels.to_string(),
                "-i",
            ])
            .arg(&audio.path)
            .args([
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "-c:a",
                "aac",
                "-ar",
                &audio.sample_rate.to_string(),
                "-movflags",
                "+faststart",
            ]);
        } else {
            cmd.args([
                "-an",
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "-movflags",
                "+faststart",
            ]);
        }
        cmd.arg(&cfg.out_path);
        tracing::debug!(?cmd, "spawning ffmpeg");

        let mut child = cmd.spawn().map_err(|e| {
            TorsoError::encoding(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TorsoError::encoding("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| TorsoError::encoding("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &SlideImage) -> TorsoResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| TorsoError::encoding("ffmpeg encoder not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(TorsoError::encoding(
                "ffmpeg encoder received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(TorsoError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if frame.data.len() != (cfg.width as usize) * (cfg.height as usize) * 3 {
            return Err(TorsoError::validation(
                "frame.data size mismatch with width*height*3",
            ));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(TorsoError::encoding("ffmpeg encoder is already finalized"));
        };

        use std::io::Write as _;
        if let Err(e) = stdin.write_all(&frame.data) {
            // ffmpeg usually closed its stdin because it gave up; its stderr says why.
            let reason = match self.reap() {
                Ok((status, stderr)) => format!("ffmpeg exited with status {status}: {stderr}"),
                Err(reap_err) => reap_err.to_string(),
            };
            self.cfg = None;
            return Err(TorsoError::encoding(format!(
                "failed to write frame to ffmpeg stdin: {e}; {reason}"
            )));
        }
        Ok(())
    }

    fn end(&mut self) -> TorsoResult<()> {
        if self.child.is_none() {
            return Err(TorsoError::encoding("ffmpeg encoder not started"));
        }
        let (status, stderr) = self.reap()?;
        self.cfg = None;
        if !status.success() {
            return Err(TorsoError::encoding(format!(
                "ffmpeg exited with status {status}: {stderr}"
            )));
        }
        Ok(())
    }
}

impl FfmpegEncoder {
    /// Close stdin, wait for ffmpeg to exit and collect its trimmed stderr.
    fn reap(&mut self) -> TorsoResult<(ExitStatus, String)> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| TorsoError::encoding("ffmpeg encoder not started"))?;

        let status = child.wait().map_err(|e| {
            TorsoError::encoding(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| TorsoError::encoding("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| TorsoError::encoding(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        Ok((status, String::from_utf8_lossy(&stderr_bytes).trim().to_string()))
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        // Abandoned mid-stream (an earlier error): don't leave ffmpeg running.
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // For rawvideo input, `-r` before `-i` sets the input framerate.
    cmd.args(["-r", &format!("{}/{}", fps.num, fps.den)]);
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> TorsoResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            TorsoError::resource(format!(
                "failed to create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}

/// Fail early with a resource error when `path` cannot be opened for writing.
///
/// Does not truncate an existing file.
pub fn ensure_writable(path: &Path) -> TorsoResult<()> {
    std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map(|_| ())
        .map_err(|e| {
            TorsoError::resource(format!(
                "output path '{}' is not writable: {e}",
                path.display()
            ))
        })
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
